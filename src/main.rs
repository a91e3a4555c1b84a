use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;

use linkopener::config::{settings_dir, CONFIG_FILENAME, SETTINGS_FILENAME};
use linkopener::{Binding, BindingStore, Bindings, EngineConfig, QueryEngine};

#[derive(Parser)]
#[command(name = "linkopener", about = "Open urls by keyword")]
struct Cli {
    /// Binding list, defaults to Settings.json in the config directory.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Engine config, defaults to config.json in the config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the results for a search, best first.
    Query {
        #[arg(required = true)]
        text: Vec<String>,

        /// Run the action of the n-th result (1-based).
        #[arg(long)]
        open: Option<usize>,

        /// Do not look up favicons.
        #[arg(long)]
        no_icons: bool,
    },

    /// List all bindings.
    List,

    /// Add a binding.
    Add {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "-")]
        delimiter: String,
        #[arg(long, default_value = "")]
        icon: String,
        /// Include in the "open all" result.
        #[arg(long)]
        bulk: bool,
    },

    /// Remove all bindings with this keyword.
    Remove { keyword: String },
}

fn load_bindings(store: &BindingStore) -> Bindings {
    let bindings = Bindings::new(store.load());

    // persist every change made through the list
    let store = store.clone();
    bindings.on_change(move |items| {
        if let Err(err) = store.save(items) {
            log::warn!("{:#}", anyhow::Error::from(err));
        }
    });

    bindings
}

fn run_query(engine: &QueryEngine, text: &str, open: Option<usize>) -> Result<()> {
    let results = engine.query(text);

    for (idx, result) in results.iter().enumerate() {
        println!("{:>2}. {}  [{}]", idx + 1, result.title, result.score);
        println!("    {}", result.subtitle);
        println!("    icon: {}", result.icon);
    }

    if let Some(n) = open {
        let Some(result) = n.checked_sub(1).and_then(|idx| results.get(idx)) else {
            bail!("no result #{} for {:?}", n, text);
        };

        if !result.action.run() {
            bail!("could not open {}", result.urls.iter().join(", "));
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let dir = settings_dir();
    let store = BindingStore::new(cli.settings.unwrap_or_else(|| dir.join(SETTINGS_FILENAME)));
    let config = EngineConfig::load(&cli.config.unwrap_or_else(|| dir.join(CONFIG_FILENAME)));

    let bindings = load_bindings(&store);

    match cli.command {
        Command::Query { text, open, no_icons } => {
            let mut engine = QueryEngine::new(bindings, &config)?;
            if no_icons {
                engine = engine.without_icons();
            }

            run_query(&engine, &text.join(" "), open)?;
        }

        Command::List => {
            bindings.read(|items| {
                for binding in items {
                    let bulk = if binding.include_in_bulk_open { " (bulk)" } else { "" };
                    println!("{}  {:?}  {}{}", binding, binding.delimiter, binding.url_template, bulk);
                }
            });
        }

        Command::Add { keyword, url, title, delimiter, icon, bulk } => {
            let binding = Binding::new(keyword.trim(), title, url)
                .with_delimiter(delimiter)
                .with_icon(icon)
                .in_bulk_open(bulk);

            binding.validate()?;
            bindings.push(binding);
        }

        Command::Remove { keyword } => {
            if bindings.remove_keyword(&keyword) == 0 {
                bail!("no binding with keyword {:?}", keyword);
            }
        }
    }

    Ok(())
}
