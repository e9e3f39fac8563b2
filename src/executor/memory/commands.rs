//! Command handlers for the memory store
//!
//! Parses arguments, runs the store operation and shapes the reply the way
//! the store would.

use super::store::{parse_f64, parse_i64, MemoryStore, ScoreBound, StoreError, StoreResult};
use crate::executor::{Command, Reply};

type Args<'a> = &'a [Vec<u8>];

/// Execute a command against the store.
pub fn execute(store: &mut MemoryStore, command: &Command) -> Reply {
    let name = command.name().to_ascii_uppercase();
    dispatch(store, &name, command.arguments()).unwrap_or_else(|e| Reply::Error(e.to_string()))
}

fn dispatch(store: &mut MemoryStore, name: &str, args: Args) -> StoreResult<Reply> {
    match name {
        "PING" => cmd_ping(args),
        "SET" => cmd_set(store, args),
        "GET" => cmd_get(store, args),
        "DEL" => cmd_del(store, args),
        "EXISTS" => cmd_exists(store, args),
        "EXPIRE" => cmd_expire(store, args),
        "TTL" => cmd_ttl(store, args),
        "PERSIST" => cmd_persist(store, args),
        "TYPE" => cmd_type(store, args),
        "KEYS" => cmd_keys(store, args),
        "INCR" => cmd_incr_by(store, args, "incr", Some(1)),
        "DECR" => cmd_incr_by(store, args, "decr", Some(-1)),
        "INCRBY" => cmd_incr_by(store, args, "incrby", None),
        "DECRBY" => cmd_decr_by(store, args),
        "HSET" | "HMSET" => cmd_hset(store, args, name),
        "HGET" => cmd_hget(store, args),
        "HGETALL" => cmd_hgetall(store, args),
        "HKEYS" => cmd_hkeys(store, args),
        "HDEL" => cmd_hdel(store, args),
        "HINCRBY" => cmd_hincrby(store, args),
        "HEXISTS" => cmd_hexists(store, args),
        "HLEN" => cmd_hlen(store, args),
        "ZADD" => cmd_zadd(store, args),
        "ZSCORE" => cmd_zscore(store, args),
        "ZINCRBY" => cmd_zincrby(store, args),
        "ZCARD" => cmd_zcard(store, args),
        "ZREM" => cmd_zrem(store, args),
        "ZRANK" => cmd_zrank(store, args, false),
        "ZREVRANK" => cmd_zrank(store, args, true),
        "ZRANGE" => cmd_zrange(store, args, false),
        "ZREVRANGE" => cmd_zrange(store, args, true),
        "ZRANGEBYSCORE" => cmd_zrangebyscore(store, args),
        "LPUSH" => cmd_push(store, args, "lpush", true),
        "RPUSH" => cmd_push(store, args, "rpush", false),
        "LPOP" => cmd_pop(store, args, "lpop", true),
        "RPOP" => cmd_pop(store, args, "rpop", false),
        "LRANGE" => cmd_lrange(store, args),
        "LLEN" => cmd_llen(store, args),
        _ => Err(StoreError::UnknownCommand(name.to_string())),
    }
}

// == Argument Helpers ==
fn arity(args: Args, expected: usize, name: &str) -> StoreResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(StoreError::WrongArity(name.to_string()))
    }
}

fn min_arity(args: Args, min: usize, name: &str) -> StoreResult<()> {
    if args.len() >= min {
        Ok(())
    } else {
        Err(StoreError::WrongArity(name.to_string()))
    }
}

fn int_arg(arg: &[u8]) -> StoreResult<i64> {
    parse_i64(arg).ok_or(StoreError::NotInteger)
}

fn float_arg(arg: &[u8]) -> StoreResult<f64> {
    parse_f64(arg).ok_or(StoreError::NotFloat)
}

fn bulk_or_nil(value: Option<Vec<u8>>) -> Reply {
    value.map_or(Reply::Nil, Reply::Bulk)
}

fn bulk_array(items: Vec<Vec<u8>>) -> Reply {
    Reply::Array(items.into_iter().map(Reply::Bulk).collect())
}

fn format_score(score: f64) -> Reply {
    Reply::Bulk(score.to_string().into_bytes())
}

fn scored_array(members: Vec<(Vec<u8>, f64)>, with_scores: bool) -> Reply {
    let mut items = Vec::with_capacity(members.len() * if with_scores { 2 } else { 1 });
    for (member, score) in members {
        items.push(Reply::Bulk(member));
        if with_scores {
            items.push(format_score(score));
        }
    }
    Reply::Array(items)
}

fn with_scores_flag(extra: Args) -> StoreResult<bool> {
    match extra {
        [] => Ok(false),
        [flag] if flag.eq_ignore_ascii_case(b"WITHSCORES") => Ok(true),
        _ => Err(StoreError::Syntax),
    }
}

// == Connection ==
fn cmd_ping(args: Args) -> StoreResult<Reply> {
    match args {
        [] => Ok(Reply::Status("PONG".to_string())),
        [message] => Ok(Reply::Bulk(message.clone())),
        _ => Err(StoreError::WrongArity("ping".to_string())),
    }
}

// == Strings ==
fn cmd_set(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    min_arity(args, 2, "set")?;

    let ttl = match &args[2..] {
        [] => None,
        [option, seconds] if option.eq_ignore_ascii_case(b"EX") => {
            let seconds = int_arg(seconds)?;
            if seconds <= 0 {
                return Err(StoreError::InvalidExpire("set".to_string()));
            }
            Some(seconds as u64)
        }
        _ => return Err(StoreError::Syntax),
    };

    store.set(&args[0], args[1].clone(), ttl)?;
    Ok(Reply::ok())
}

fn cmd_get(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "get")?;
    Ok(bulk_or_nil(store.get(&args[0])?))
}

fn cmd_incr_by(
    store: &mut MemoryStore,
    args: Args,
    name: &str,
    fixed: Option<i64>,
) -> StoreResult<Reply> {
    let delta = match fixed {
        Some(delta) => {
            arity(args, 1, name)?;
            delta
        }
        None => {
            arity(args, 2, name)?;
            int_arg(&args[1])?
        }
    };
    Ok(Reply::Int(store.incr_by(&args[0], delta)?))
}

fn cmd_decr_by(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 2, "decrby")?;
    let delta = int_arg(&args[1])?
        .checked_neg()
        .ok_or(StoreError::Overflow)?;
    Ok(Reply::Int(store.incr_by(&args[0], delta)?))
}

// == Key Lifecycle ==
fn cmd_del(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    min_arity(args, 1, "del")?;
    let removed = args.iter().filter(|key| store.delete(key)).count();
    Ok(Reply::Int(removed as i64))
}

fn cmd_exists(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    min_arity(args, 1, "exists")?;
    let found = args.iter().filter(|key| store.exists(key)).count();
    Ok(Reply::Int(found as i64))
}

fn cmd_expire(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 2, "expire")?;
    let seconds = int_arg(&args[1])?;
    Ok(Reply::Int(i64::from(store.expire(&args[0], seconds)?)))
}

fn cmd_ttl(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "ttl")?;
    Ok(Reply::Int(store.ttl(&args[0])))
}

fn cmd_persist(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "persist")?;
    Ok(Reply::Int(i64::from(store.persist(&args[0]))))
}

fn cmd_type(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "type")?;
    Ok(Reply::Status(store.key_type(&args[0]).to_string()))
}

fn cmd_keys(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "keys")?;
    Ok(bulk_array(store.keys(&args[0])))
}

// == Hashes ==
fn cmd_hset(store: &mut MemoryStore, args: Args, name: &str) -> StoreResult<Reply> {
    if args.len() < 3 || args.len() % 2 == 0 {
        return Err(StoreError::WrongArity(name.to_ascii_lowercase()));
    }
    let pairs = args[1..]
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    let added = store.hset(&args[0], pairs)?;
    if name == "HMSET" {
        Ok(Reply::ok())
    } else {
        Ok(Reply::Int(added))
    }
}

fn cmd_hget(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 2, "hget")?;
    Ok(bulk_or_nil(store.hget(&args[0], &args[1])?))
}

fn cmd_hgetall(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "hgetall")?;
    let items = store
        .hget_all(&args[0])?
        .into_iter()
        .flat_map(|(field, value)| [Reply::Bulk(field), Reply::Bulk(value)])
        .collect();
    Ok(Reply::Array(items))
}

fn cmd_hkeys(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "hkeys")?;
    Ok(bulk_array(store.hkeys(&args[0])?))
}

fn cmd_hdel(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    min_arity(args, 2, "hdel")?;
    Ok(Reply::Int(store.hdel(&args[0], &args[1..])?))
}

fn cmd_hincrby(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 3, "hincrby")?;
    let delta = int_arg(&args[2])?;
    Ok(Reply::Int(store.hincr_by(&args[0], &args[1], delta)?))
}

fn cmd_hexists(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 2, "hexists")?;
    Ok(Reply::Int(i64::from(store.hexists(&args[0], &args[1])?)))
}

fn cmd_hlen(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "hlen")?;
    Ok(Reply::Int(store.hlen(&args[0])?))
}

// == Sorted Sets ==
fn cmd_zadd(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    if args.len() < 3 || args.len() % 2 == 0 {
        return Err(StoreError::WrongArity("zadd".to_string()));
    }
    let pairs = args[1..]
        .chunks_exact(2)
        .map(|pair| Ok((float_arg(&pair[0])?, pair[1].clone())))
        .collect::<StoreResult<Vec<_>>>()?;
    Ok(Reply::Int(store.zadd(&args[0], pairs)?))
}

fn cmd_zscore(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 2, "zscore")?;
    Ok(store
        .zscore(&args[0], &args[1])?
        .map_or(Reply::Nil, format_score))
}

fn cmd_zincrby(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 3, "zincrby")?;
    let delta = float_arg(&args[1])?;
    Ok(format_score(store.zincr_by(&args[0], &args[2], delta)?))
}

fn cmd_zcard(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "zcard")?;
    Ok(Reply::Int(store.zcard(&args[0])?))
}

fn cmd_zrem(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    min_arity(args, 2, "zrem")?;
    Ok(Reply::Int(store.zrem(&args[0], &args[1..])?))
}

fn cmd_zrank(store: &mut MemoryStore, args: Args, reverse: bool) -> StoreResult<Reply> {
    arity(args, 2, if reverse { "zrevrank" } else { "zrank" })?;
    Ok(store
        .zrank(&args[0], &args[1], reverse)?
        .map_or(Reply::Nil, |rank| Reply::Int(rank as i64)))
}

fn cmd_zrange(store: &mut MemoryStore, args: Args, reverse: bool) -> StoreResult<Reply> {
    min_arity(args, 3, if reverse { "zrevrange" } else { "zrange" })?;
    let start = int_arg(&args[1])?;
    let stop = int_arg(&args[2])?;
    let with_scores = with_scores_flag(&args[3..])?;
    let members = store.zrange(&args[0], start, stop, reverse)?;
    Ok(scored_array(members, with_scores))
}

fn cmd_zrangebyscore(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    min_arity(args, 3, "zrangebyscore")?;
    let min = ScoreBound::parse(&args[1])?;
    let max = ScoreBound::parse(&args[2])?;
    let with_scores = with_scores_flag(&args[3..])?;
    let members = store.zrange_by_score(&args[0], min, max)?;
    Ok(scored_array(members, with_scores))
}

// == Lists ==
fn cmd_push(store: &mut MemoryStore, args: Args, name: &str, front: bool) -> StoreResult<Reply> {
    min_arity(args, 2, name)?;
    Ok(Reply::Int(store.push(&args[0], args[1..].to_vec(), front)?))
}

fn cmd_pop(store: &mut MemoryStore, args: Args, name: &str, front: bool) -> StoreResult<Reply> {
    arity(args, 1, name)?;
    Ok(bulk_or_nil(store.pop(&args[0], front)?))
}

fn cmd_lrange(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 3, "lrange")?;
    let start = int_arg(&args[1])?;
    let stop = int_arg(&args[2])?;
    Ok(bulk_array(store.lrange(&args[0], start, stop)?))
}

fn cmd_llen(store: &mut MemoryStore, args: Args) -> StoreResult<Reply> {
    arity(args, 1, "llen")?;
    Ok(Reply::Int(store.llen(&args[0])?))
}
