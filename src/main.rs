use std::io::Write;

use clap::{Args, Parser, Subcommand};
use oauth2_errors::{
    FragmentError, OAuth2Error, RedirectOptions, UriFragment, codes, create_from_code,
    create_with_status,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "oauth2-errors",
    about = "Render OAuth 2.0 errors as JSON payloads, URI fragments or redirect URLs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the error code table.
    List,
    /// Print the JSON payload of an error.
    Json(ErrorArgs),
    /// Print the URI fragment of an error.
    Fragment {
        #[command(flatten)]
        error: ErrorArgs,
        /// Omit the leading `#`.
        #[arg(long)]
        no_hash: bool,
    },
    /// Print a redirect URL carrying the error in its fragment.
    Redirect {
        #[command(flatten)]
        error: ErrorArgs,
        redirect_uri: String,
        #[arg(long)]
        state: Option<String>,
    },
}

#[derive(Debug, Args)]
struct ErrorArgs {
    /// OAuth 2.0 error code, e.g. invalid_grant.
    code: String,
    /// Use a custom status instead of the table entry.
    #[arg(long)]
    status: Option<u16>,
    #[arg(long)]
    message: Option<String>,
    /// Extra context as a JSON document.
    #[arg(long)]
    data: Option<String>,
}

impl ErrorArgs {
    fn build(&self) -> Result<OAuth2Error, FragmentError> {
        let data = self
            .data
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()?;

        let error = match self.status {
            Some(status) => create_with_status(
                &self.code,
                status,
                self.message.as_deref().unwrap_or_default(),
                data,
            ),
            None => create_from_code(&self.code, self.message.as_deref(), data),
        };
        Ok(error)
    }
}

fn main() -> Result<(), FragmentError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::List => {
            for entry in codes::entries() {
                writeln!(
                    out,
                    "{:<26} {} {}",
                    entry.code.as_str(),
                    entry.status_code,
                    entry.message
                )?;
            }
        }
        Command::Json(error) => {
            let error = error.build()?;
            writeln!(out, "{}", serde_json::to_string_pretty(error.payload())?)?;
        }
        Command::Fragment { error, no_hash } => {
            writeln!(out, "{}", error.build()?.to_uri_frag(no_hash))?;
        }
        Command::Redirect {
            error,
            redirect_uri,
            state,
        } => {
            let options = RedirectOptions { state };
            writeln!(out, "{}", error.build()?.redirect_url(&redirect_uri, &options)?)?;
        }
    }
    out.flush()?;
    Ok(())
}
