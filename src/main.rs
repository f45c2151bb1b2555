use bilingual_render::orchestrator::LOGIN_PATH;
use bilingual_render::{
    AudioFormat, AudioOptions, AudioOutcome, BilingualService, Config, DisplayState, FormInput,
    HttpBilingualService, MockService, Orchestrator, Outcome, SessionStatus, Submission,
    render_page,
};
use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    // before the subscriber, so RUST_LOG can come from .env
    dotenvy::dotenv().ok();
    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::from_env()?;

    let source_text = match matches.get_one::<String>("file") {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?,
        None => matches.get_one::<String>("text").cloned().unwrap_or_default(),
    };

    let form = FormInput {
        source_text,
        target_language: matches
            .get_one::<String>("target-language")
            .cloned()
            .unwrap_or_default(),
        output_format: matches.get_one::<String>("format").cloned(),
        layout: matches.get_one::<String>("layout").cloned(),
        number_of_questions: matches
            .get_one::<String>("questions")
            .map(|q| serde_json::Value::String(q.clone())),
        lemmatization: matches.get_flag("lemmatize"),
        filter_out_stop_words: matches.get_flag("filter-stop-words"),
    };
    let submission = Submission::try_from(form)?;

    let audio = match matches.get_one::<String>("audio") {
        Some(format) => Some(AudioOptions {
            format: format.parse::<AudioFormat>()?,
            break_time_ms: matches.get_one::<u32>("break-ms").copied(),
            ssml_only: matches.get_flag("ssml-only"),
        }),
        None => None,
    };
    let output = matches.get_one::<String>("output").map(PathBuf::from);

    if matches.get_flag("mock") {
        run(Orchestrator::new(MockService::new(), config), &submission, audio, output).await
    } else {
        let service = HttpBilingualService::new(&config)?;
        let orchestrator = Orchestrator::new(service, config);
        if let SessionStatus::LoginRequired = orchestrator.check_session().await? {
            return Err(format!(
                "Not signed in; log in at {}{}",
                orchestrator.config().api_url,
                LOGIN_PATH
            )
            .into());
        }
        run(orchestrator, &submission, audio, output).await
    }
}

/// Command-line definition of `bilingual`.
fn cli() -> Command {
    Command::new("bilingual")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build and render a bilingual reading text")
        .arg(
            Arg::new("text")
                .help("Source text to translate (or use --file)")
                .index(1),
        )
        .arg(
            Arg::new("target-language")
                .long("to")
                .short('t')
                .help("Target language code (e.g., es, fr, de)")
                .required(true),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .help("Read the source text from a file")
                .conflicts_with("text"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format: web, json or pdf")
                .default_value("web"),
        )
        .arg(
            Arg::new("layout")
                .long("layout")
                .short('l')
                .help("Layout: continuous or side-by-side")
                .default_value("continuous"),
        )
        .arg(
            Arg::new("lemmatize")
                .long("lemmatize")
                .help("Add a lemma frequency table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("filter-stop-words")
                .long("filter-stop-words")
                .help("Leave stop words out of the lemma table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("questions")
                .long("questions")
                .short('q')
                .help("Number of reading questions to generate (default: 2)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the result to this file instead of stdout"),
        )
        .arg(
            Arg::new("audio")
                .long("audio")
                .help("Also generate audio: bilingual, bilingual_and_repeat_source_slowly, source_language or target_language"),
        )
        .arg(
            Arg::new("ssml-only")
                .long("ssml-only")
                .help("With --audio, only generate the SSML markup")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("break-ms")
                .long("break-ms")
                .help("With --audio, pause after each syntagma in milliseconds")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the offline mock service instead of the API")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log each request")
                .action(ArgAction::SetTrue),
        )
}

async fn run<S: BilingualService>(
    orchestrator: Orchestrator<S>,
    submission: &Submission,
    audio: Option<AudioOptions>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = DisplayState::from(orchestrator.submit(submission).await);

    let outcome = match state {
        DisplayState::Ready(outcome) => outcome,
        DisplayState::Error(message) => return Err(message.into()),
        DisplayState::LoginRequired => {
            return Err(format!("Session expired; log in again at {}", LOGIN_PATH).into());
        }
    };

    match outcome {
        Outcome::Web(result) => {
            let title = format!("Bilingual text ({})", result.session.target_language);
            let page = render_page(&title, &result.content, result.lemmas.as_deref());
            write_output(output.as_ref(), page.as_bytes())?;

            if let Some(options) = audio {
                match orchestrator
                    .request_audio(Some(&result.session), &options)
                    .await
                {
                    Ok(AudioOutcome::Audio { url }) => eprintln!("Audio generated: {}", url),
                    Ok(AudioOutcome::Ssml {
                        markup,
                        download_url,
                    }) => {
                        eprintln!("SSML generated. Download: {}", download_url);
                        eprintln!("{}", markup);
                    }
                    Ok(AudioOutcome::NoLink) => {
                        eprintln!("Audio generated, but no download link provided.")
                    }
                    Err(e) => eprintln!("{}", e.user_message()),
                }
            }
        }
        Outcome::Json(json) => write_output(output.as_ref(), json.as_bytes())?,
        Outcome::Pdf(download) => {
            let path = output.unwrap_or_else(|| PathBuf::from(&download.file_name));
            fs::write(&path, &download.bytes)?;
            eprintln!("PDF downloaded successfully: {}", path.display());
        }
        Outcome::Superseded => eprintln!("Result replaced by a newer submission"),
    }

    Ok(())
}

fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> std::io::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes)?;
            info!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_cli_parses_submission_flags() {
        let matches = cli()
            .try_get_matches_from([
                "bilingual", "--to", "es", "--layout", "side-by-side", "--lemmatize", "-q", "3",
                "--audio", "bilingual", "--break-ms", "500", "Hello.",
            ])
            .unwrap();
        assert_eq!(matches.get_one::<String>("text").unwrap(), "Hello.");
        assert_eq!(matches.get_one::<String>("target-language").unwrap(), "es");
        assert_eq!(matches.get_one::<String>("layout").unwrap(), "side-by-side");
        assert_eq!(matches.get_one::<String>("format").unwrap(), "web");
        assert!(matches.get_flag("lemmatize"));
        assert_eq!(matches.get_one::<u32>("break-ms"), Some(&500));
    }

    #[test]
    fn test_cli_requires_target_language() {
        assert!(cli().try_get_matches_from(["bilingual", "Hello."]).is_err());
    }
}
