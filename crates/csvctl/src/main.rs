//! csvctl - command-line access to a csvdb table

mod command;

use anyhow::{Context, Result};
use clap::Parser;
use csvfacade::{CsvFacade, Format};
use std::path::PathBuf;
use tracing::{debug, error};

use crate::command::Command;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Table file
    #[arg(short, long)]
    file: PathBuf,

    /// Comma-separated field names; omit to read them from the header line
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Column delimiter
    #[arg(short, long, default_value_t = ';')]
    delimiter: char,

    /// Line separator (\n, \r and \t escapes are understood)
    #[arg(long, default_value = "\\n")]
    line_separator: String,

    #[command(subcommand)]
    command: Command,
}

fn unescape(input: &str) -> String {
    input
        .replace("\\r", "\r")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
}

impl Args {
    fn facade(&self) -> Result<CsvFacade> {
        let format = Format::new(self.delimiter, unescape(&self.line_separator))
            .context("invalid table format")?;
        Ok(CsvFacade::new(&self.file, self.fields.clone()).with_format(format))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    debug!("{:?}", args);

    let facade = args.facade()?;

    match command::run(&facade, args.command).await {
        Ok(Some(output)) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            error!("{} failed: {:#}", args.file.display(), e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["csvctl", "--file", "users.csv", "get"]).unwrap();

        assert_eq!(args.file, PathBuf::from("users.csv"));
        assert_eq!(args.fields, None);
        assert_eq!(args.delimiter, ';');
        assert_eq!(args.command, Command::Get { id: None });

        let facade = args.facade().unwrap();
        assert_eq!(facade.db().format(), &Format::default());
    }

    #[test]
    fn test_args_explicit_fields() {
        let args = Args::try_parse_from([
            "csvctl",
            "-f",
            "users.csv",
            "--fields",
            "id,name,password",
            "delete",
            "2",
        ])
        .unwrap();

        assert_eq!(
            args.fields,
            Some(vec![
                "id".to_string(),
                "name".to_string(),
                "password".to_string()
            ])
        );
        assert_eq!(args.command, Command::Delete { id: "2".to_string() });
    }

    #[test]
    fn test_args_custom_format() {
        let args = Args::try_parse_from([
            "csvctl",
            "--file",
            "users.csv",
            "--delimiter",
            ",",
            "--line-separator",
            "\\r\\n",
            "init",
        ])
        .unwrap();

        let facade = args.facade().unwrap();
        assert_eq!(facade.db().format().delimiter(), ',');
        assert_eq!(facade.db().format().line_separator(), "\r\n");
    }

    #[test]
    fn test_args_rejects_bad_format() {
        let args = Args::try_parse_from([
            "csvctl",
            "--file",
            "users.csv",
            "--delimiter",
            "|",
            "--line-separator",
            "|",
            "init",
        ])
        .unwrap();

        assert!(args.facade().is_err());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("\\n"), "\n");
        assert_eq!(unescape("\\r\\n"), "\r\n");
        assert_eq!(unescape(";"), ";");
    }
}
