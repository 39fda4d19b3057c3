use std::process::ExitCode;
use clap::Parser;

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "list-users", version, about = "Lists doctors and patients stored in Firestore", long_about = None)]
pub struct CliArgs {
    /// Service account JSON; falls back to GOOGLE_APPLICATION_CREDENTIALS, then ./serviceAccountKey.json
    #[arg(value_name = "CREDENTIAL_PATH")]
    pub credential_path: Option<String>,
}

impl CliArgs {
    /// Help and version exit 0; usage errors exit 1 like every other failure.
    pub fn parse_or_exit() -> Result<Self, ExitCode> {
        Self::try_parse().map_err(|err| {
            let _ = err.print();
            if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("list-users").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_optional_credential_path() {
        assert_eq!(parse(&[]).unwrap().credential_path, None);
        assert_eq!(parse(&["/keys/clinic.json"]).unwrap().credential_path.as_deref(), Some("/keys/clinic.json"));
    }

    #[test]
    fn test_help_is_not_a_credential_path() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["--verbose"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
    }
}
