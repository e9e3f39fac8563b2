//! Command Builder
//!
//! A command name plus binary-safe arguments.

// == Command ==
/// A single store command.
///
/// ```ignore
/// let cmd = Command::new("SET").arg("zengate_name").arg("corel").arg("EX").arg("30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    args: Vec<Vec<u8>>,
}

impl Command {
    /// Creates a command with no arguments.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.args.push(arg.as_ref().to_vec());
        self
    }

    /// Appends an integer argument in decimal form.
    pub fn arg_int(self, value: i64) -> Self {
        self.arg(value.to_string())
    }

    /// Appends every argument of an iterator.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_vec()));
        self
    }

    /// Returns the command name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &[Vec<u8>] {
        &self.args
    }

    /// Consumes the command and returns its parts.
    pub fn into_parts(self) -> (&'static str, Vec<Vec<u8>>) {
        (self.name, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = Command::new("SET")
            .arg("name")
            .arg(b"corel".as_slice())
            .arg("EX")
            .arg_int(30);

        assert_eq!(cmd.name(), "SET");
        assert_eq!(
            cmd.arguments(),
            &[
                b"name".to_vec(),
                b"corel".to_vec(),
                b"EX".to_vec(),
                b"30".to_vec()
            ]
        );
    }

    #[test]
    fn test_command_args_from_iter() {
        let cmd = Command::new("DEL").args(["a", "b", "c"]);
        let (name, args) = cmd.into_parts();
        assert_eq!(name, "DEL");
        assert_eq!(args.len(), 3);
    }
}
