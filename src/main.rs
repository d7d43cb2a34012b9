mod assistant;
mod chat;
mod cli;
mod color;
mod config;
mod listings;
mod session;
mod utils;
mod version;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use cli::{call::call_cmd, chat::chat_cmd, list::list_cmd, show::show_cmd, ColorMode};
use listings::Category;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Default, Clone, Copy, ValueEnum, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "showroom")]
#[command(
    about = "Browse a car marketplace and chat with its sales assistant",
    version = "0.0.1-alpha.1"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, global = true, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    /// Read the configuration from this file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the sales assistant
    Chat(ChatArgs),
    /// List cars and other objects
    List(ListArgs),
    /// Show the details of a car
    Show(ShowArgs),
    /// Call a salesperson
    Call(CallArgs),
}

#[derive(Args, Default)]
pub(crate) struct ChatArgs {
    /// Enter interactive mode
    #[arg(short, long)]
    interactive: bool,
    /// Specify the initial prompt
    prompt: Option<String>,
}

/// Possible listings
#[derive(Subcommand)]
pub(crate) enum ListObject {
    /// Cars for sale
    Cars(ListCarArgs),
    /// Car categories
    Categories,
    /// Salespeople from the configuration
    Contacts,
    /// Suggested questions for the assistant
    Prompts,
    /// Topics the assistant can answer
    Topics,
}

/// Output formats
#[derive(ValueEnum, Default, Clone, Copy, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum ListingFormat {
    /// Format the output as a table
    #[default]
    Table,
    /// Format the output as JSON
    Json,
    /// Format the output as a table without a header
    HeaderlessTable,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Output the listing with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
    /// List the specified object
    #[command(subcommand)]
    object: ListObject,
}

#[derive(Args, Default)]
pub(crate) struct ListCarArgs {
    /// Only list cars whose brand or model contains this text
    #[arg(short, long)]
    search: Option<String>,
    /// Only list cars of this category
    #[arg(short, long, value_parser = parse_category)]
    category: Option<Category>,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    /// The id of the car, as printed by `list cars`
    id: String,
    /// Output the car with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
}

#[derive(Args, Default)]
pub(crate) struct CallArgs {
    /// Dial the contact with this number, as printed by `list contacts`
    contact: Option<usize>,
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse::<Category>()
        .map_err(|_| format!("unknown category \"{}\"", s))
}

fn init_logging(verbose: u8) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if verbose == 0 => filter,
        _ => match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    color::configure_color(ColorMode::resolve_auto(cli.color));

    debug!(color = %color::color_mode(), "resolved color mode");

    let config = config::read_config(cli.config);

    match &cli.command {
        Some(Commands::Chat(args)) => chat_cmd(&config, args).await,
        Some(Commands::List(args)) => list_cmd(&config, args).await,
        Some(Commands::Show(args)) => show_cmd(&config, args).await,
        Some(Commands::Call(args)) => call_cmd(&config, args),
        None => chat_cmd(&config, &ChatArgs::default()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_cars() {
        let cli =
            Cli::try_parse_from(["showroom", "list", "-f", "json", "cars", "-c", "suv"]).unwrap();

        match cli.command {
            Some(Commands::List(ListArgs {
                format: ListingFormat::Json,
                object: ListObject::Cars(args),
            })) => {
                assert_eq!(args.category, Some(Category::Suv));
                assert!(args.search.is_none());
            }
            _ => panic!("expected a car listing"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["showroom", "chat", "-vv", "--color", "off", "halo"]).unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, RequestedColorMode::Off));

        match cli.command {
            Some(Commands::Chat(args)) => assert_eq!(args.prompt.as_deref(), Some("halo")),
            _ => panic!("expected a chat"),
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(Cli::try_parse_from(["showroom", "list", "cars", "-c", "truck"]).is_err());
    }
}
