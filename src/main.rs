use std::fs::{read_to_string, File};
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use esdir::card::StreamerCard;
use esdir::config::Config;
use esdir::counter::{self, CounterDisplay};
use esdir::streamers::{FilterMode, StreamerDirectory};
use esdir::tournaments::{TournamentContainer, TournamentDirectory};
use esdir::{html, site, StreamerRecord, TournamentRecord};

#[derive(Parser)]
#[command(name = "esdir")]
#[command(about = "Streamer and tournament directory renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List streamers")]
    Streamers {
        #[arg(short, long, default_value = "all", help = "all, pro or streamers")]
        filter: String,
        #[arg(short, long, default_value = "", help = "Nickname substring")]
        search: String,
        #[arg(long = "html", help = "Print card markup instead of text")]
        markup: bool,
        #[arg(long, help = "Skip the counter animation")]
        no_animate: bool,
        #[command(flatten)]
        config: Config,
    },
    #[command(about = "List tournaments")]
    Tournaments {
        #[arg(long = "html", help = "Print card markup instead of text")]
        markup: bool,
        #[command(flatten)]
        config: Config,
    },
    #[command(arg_required_else_help = true, about = "Render sections into a page template")]
    Build {
        #[arg(short, long, help = "HTML page template")]
        template: PathBuf,
        #[arg(short, help = "Output file")]
        output: PathBuf,
        #[arg(short, long, default_value = "all")]
        filter: String,
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, help = "Render the full streamer list")]
        reveal: bool,
        #[command(flatten)]
        config: Config,
    },
    #[command(about = "Drive the streamer directory from stdin")]
    Session {
        #[command(flatten)]
        config: Config,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Cli::parse();
    match args.command {
        Commands::Streamers {
            filter,
            search,
            markup,
            no_animate,
            config,
        } => {
            let result = config
                .loader()
                .load::<StreamerRecord>(&config.streamers_path)
                .await;
            let mut dir = StreamerDirectory::new(config.is_touch());
            dir.loaded(result);
            show_counter(dir.counter(), &config, no_animate).await;
            if dir.counter() == CounterDisplay::Failed {
                return Ok(());
            }
            dir.set_filter(FilterMode::parse_lenient(&filter));
            dir.set_search(&search);
            dir.reveal();
            if markup {
                println!("{}", html::streamer_cards(dir.container()));
            } else {
                print_streamers(&dir);
            }
            Ok(())
        }
        Commands::Tournaments { markup, config } => {
            let result = config
                .loader()
                .load::<TournamentRecord>(&config.tournaments_path)
                .await;
            let mut dir = TournamentDirectory::new();
            dir.loaded(result);
            if markup {
                println!("{}", html::tournament_container(dir.container()));
                return Ok(());
            }
            match dir.container() {
                TournamentContainer::Cards(cards) => {
                    for c in cards {
                        println!("{} | {} | {} | {}", c.date, c.game, c.name, c.team);
                        println!("    {} [{}]", c.placement, c.placement_class.css_class());
                        if !c.teammates.is_empty() {
                            println!("    with {}", c.teammates.join(", "));
                        }
                        for a in &c.links {
                            println!("    {}: {}", a.label, a.href);
                        }
                    }
                }
                TournamentContainer::Error(msg) => eprintln!("{}", msg),
            }
            Ok(())
        }
        Commands::Build {
            template,
            output,
            filter,
            search,
            reveal,
            config,
        } => {
            let source = read_to_string(&template)?;
            let actions = site::Interactions {
                filter: FilterMode::parse_lenient(&filter),
                search,
                reveal,
            };
            let rendered = site::build_page(&source, &config, &actions).await;
            let mut f = File::create(&output)?;
            f.write_all(rendered.as_bytes())?;
            info!("Wrote {}", output.display());
            Ok(())
        }
        Commands::Session { config } => run_session(config).await,
    }
}

async fn show_counter(display: CounterDisplay, config: &Config, no_animate: bool) {
    match display {
        CounterDisplay::Value(target) if !no_animate => {
            counter::animate(target, config.counter_duration(), |v| {
                eprint!("\r{} streamers", v);
            })
            .await;
            eprintln!();
        }
        other => eprintln!("{} streamers", other),
    }
}

fn print_streamers(dir: &StreamerDirectory) {
    for (i, card) in dir.container().iter().enumerate() {
        println!("{}", describe(i, card, dir.open_tooltip() == Some(i)));
    }
}

fn describe(index: usize, card: &StreamerCard, tooltip_open: bool) -> String {
    let mut line = format!("{:>3}. {}", index, card.nickname);
    if let Some(name) = &card.tooltip {
        if tooltip_open {
            line.push_str(&format!(" [{}]", name));
        } else {
            line.push_str(" [*]");
        }
    }
    if card.liquipedia.is_some() {
        line.push_str(" (i)");
    }
    for a in &card.links {
        line.push_str(&format!(" {}={}", a.label, a.href));
    }
    line
}

#[derive(Debug, PartialEq)]
enum SessionCommand {
    Reveal,
    Filter(FilterMode),
    Search(String),
    Menu,
    Tap(usize),
    TapOutside,
    Quit,
    Blank,
    Invalid(String),
}

fn parse_command(line: &str) -> SessionCommand {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    match cmd {
        "reveal" => SessionCommand::Reveal,
        "filter" => SessionCommand::Filter(FilterMode::parse_lenient(rest.trim())),
        "search" => SessionCommand::Search(rest.to_owned()),
        "menu" => SessionCommand::Menu,
        "tap" if rest.trim().is_empty() => SessionCommand::TapOutside,
        "tap" => match rest.trim().parse::<usize>() {
            Ok(i) => SessionCommand::Tap(i),
            Err(_) => SessionCommand::Invalid("tap expects a card number".to_string()),
        },
        "quit" | "exit" => SessionCommand::Quit,
        "" => SessionCommand::Blank,
        other => SessionCommand::Invalid(format!("unknown command {:?}", other)),
    }
}

async fn run_session(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = config
        .loader()
        .load::<StreamerRecord>(&config.streamers_path)
        .await;
    let mut dir = StreamerDirectory::new(config.is_touch());
    dir.loaded(result);
    println!("{} streamers", dir.counter());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            SessionCommand::Reveal => dir.reveal(),
            SessionCommand::Filter(mode) => dir.set_filter(mode),
            SessionCommand::Search(text) => dir.set_search(&text),
            SessionCommand::Menu => dir.toggle_menu(),
            SessionCommand::Tap(i) => dir.tap_nickname(i),
            SessionCommand::TapOutside => dir.tap_outside(),
            SessionCommand::Quit => break,
            SessionCommand::Blank => continue,
            SessionCommand::Invalid(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        }
        if dir.menu_open() {
            let options = dir
                .filter_options()
                .iter()
                .map(|(m, active)| if *active { format!("*{}", m) } else { m.to_string() })
                .collect::<Vec<_>>();
            println!("[{}] {}", dir.filter().label(), options.join(" "));
        }
        print_streamers(&dir);
    }
    Ok(())
}
