//! Value readers - where missing variable values come from
//!
//! The store only knows the [`ValueReader`] trait. Readers for the console,
//! hidden terminal input and the process environment are provided, and any
//! `FnMut(&str) -> io::Result<String>` closure works as a reader too.

use std::io::{self, BufRead, Write};

/// Supplies a value for a variable that has none yet
pub trait ValueReader {
    /// Return the value for `key`. An empty string is a valid value.
    fn read_value(&mut self, key: &str) -> io::Result<String>;
}

impl<F> ValueReader for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn read_value(&mut self, key: &str) -> io::Result<String> {
        self(key)
    }
}

fn prompt_for(key: &str) -> String {
    format!("Enter value for secret variable '{}': ", key)
}

/// Prompts on one stream and reads a line from another
pub struct ConsoleReader<R, W> {
    input: R,
    output: W,
}

impl ConsoleReader<io::StdinLock<'static>, io::Stdout> {
    /// Reader bound to the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the underlying streams
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> ValueReader for ConsoleReader<R, W> {
    fn read_value(&mut self, key: &str) -> io::Result<String> {
        writeln!(self.output, "{}", prompt_for(key))?;
        self.output.flush()?;

        // EOF reads as an empty value
        let mut line = String::new();
        self.input.read_line(&mut line)?;

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// Prompts on the terminal without echoing the typed value
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenReader;

impl ValueReader for HiddenReader {
    fn read_value(&mut self, key: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt_for(key))
    }
}

/// Reads values from environment variables
///
/// The key is upper-cased and every non-alphanumeric character becomes `_`,
/// then the prefix is prepended: with prefix `APP_`, "special number" is
/// looked up as `APP_SPECIAL_NUMBER`.
#[derive(Debug, Default, Clone)]
pub struct EnvReader {
    prefix: String,
}

impl EnvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable name used for `key`
    pub fn var_name(&self, key: &str) -> String {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, name)
    }
}

impl ValueReader for EnvReader {
    fn read_value(&mut self, key: &str) -> io::Result<String> {
        let name = self.var_name(key);
        std::env::var(&name).map_err(|e| match e {
            std::env::VarError::NotPresent => io::Error::new(
                io::ErrorKind::NotFound,
                format!("environment variable {} is not set", name),
            ),
            std::env::VarError::NotUnicode(_) => io::Error::new(
                io::ErrorKind::InvalidData,
                format!("environment variable {} is not valid UTF-8", name),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_console_reader_prompts_and_reads_line() {
        let input = Cursor::new(b"world\r\neggo\n".to_vec());
        let mut reader = ConsoleReader::new(input, Vec::new());

        assert_eq!(reader.read_value("hello").unwrap(), "world");
        assert_eq!(reader.read_value("leggo").unwrap(), "eggo");

        let (_, output) = reader.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Enter value for secret variable 'hello': "));
        assert!(output.contains("'leggo'"));
    }

    #[test]
    fn test_console_reader_eof_is_empty_value() {
        let mut reader = ConsoleReader::new(Cursor::new(Vec::new()), io::sink());
        assert_eq!(reader.read_value("anything").unwrap(), "");
    }

    #[test]
    fn test_console_reader_keeps_inner_whitespace() {
        let input = Cursor::new(b"  two words \n".to_vec());
        let mut reader = ConsoleReader::new(input, io::sink());
        assert_eq!(reader.read_value("k").unwrap(), "  two words ");
    }

    #[test]
    fn test_closure_is_reader() {
        let mut calls = 0;
        let mut reader = |key: &str| {
            calls += 1;
            Ok::<_, io::Error>(key.to_uppercase())
        };
        assert_eq!(reader.read_value("abc").unwrap(), "ABC");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_env_var_name() {
        let reader = EnvReader::with_prefix("APP_");
        assert_eq!(reader.var_name("special number"), "APP_SPECIAL_NUMBER");
        assert_eq!(EnvReader::new().var_name("api/openai"), "API_OPENAI");
    }

    #[test]
    fn test_env_reader() {
        let name = format!("SECRETVARS_TEST_{}_", std::process::id());
        let mut reader = EnvReader::with_prefix(name.clone());
        std::env::set_var(format!("{}TOKEN", name), "abc123");

        assert_eq!(reader.read_value("token").unwrap(), "abc123");

        let err = reader.read_value("absent").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
