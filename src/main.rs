use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use postboard::build::{render_page, Page};
use postboard::clipboard::{Clipboard, CommandClipboard, NoClipboard};
use postboard::config::Config;
use postboard::dom::Document;
use postboard::fetch::DirFetcher;
use postboard::index_view::Event;
use postboard::theme::{init_theme, set_theme, toggle_theme, FilePreferenceStore, Theme};
use std::path::{Path, PathBuf};
use url::Url;

fn main() {
    if let Err(e) = run() {
        eprintln!("ERROR {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("postboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders a static blog's index and post pages from its post manifest")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("site")
                .long("site")
                .takes_value(true)
                .default_value(".")
                .global(true)
                .help("The site directory (or any directory below it)"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .global(true)
                .help("Enables debug logging"),
        )
        .subcommand(
            SubCommand::with_name("index")
                .about("Renders the index page")
                .arg(Arg::with_name("tag").long("tag").takes_value(true).help("Selects a tag in the tag bar"))
                .arg(Arg::with_name("query").long("query").takes_value(true).help("Types into the search box"))
                .arg(Arg::with_name("shortcut").long("shortcut").help("Presses Ctrl+K"))
                .arg(output_arg()),
        )
        .subcommand(
            SubCommand::with_name("post")
                .about("Renders a post page")
                .arg(Arg::with_name("slug").long("slug").takes_value(true).conflicts_with("url"))
                .arg(
                    Arg::with_name("url")
                        .long("url")
                        .takes_value(true)
                        .help("The page location, e.g. http://localhost/post.html?slug=hello"),
                )
                .arg(Arg::with_name("copy-link").long("copy-link").help("Clicks \"Copy link\""))
                .arg(output_arg()),
        )
        .subcommand(
            SubCommand::with_name("theme")
                .about("Shows or changes the persisted light/dark preference")
                .arg(Arg::with_name("theme").possible_values(&["light", "dark", "toggle"])),
        )
        .get_matches();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match matches.is_present("verbose") {
            true => "debug",
            false => "warn",
        },
    ))
    .init();

    let site = PathBuf::from(matches.value_of("site").unwrap_or("."));
    let config = Config::from_directory(&site)?;
    let fetch = DirFetcher::new(&config.site_directory);
    let mut preferences = FilePreferenceStore::open(&config.preferences);

    match matches.subcommand() {
        ("index", Some(m)) => {
            let mut events = Vec::new();
            if let Some(tag) = m.value_of("tag") {
                events.push(Event::TagClicked(Some(tag.to_owned())));
            }
            if let Some(query) = m.value_of("query") {
                events.push(Event::SearchInput(query.to_owned()));
            }
            if m.is_present("shortcut") {
                events.push(Event::KeyDown {
                    key: String::from("k"),
                    ctrl: true,
                    meta: false,
                });
            }
            let html = render_page(
                &config,
                &fetch,
                &mut preferences,
                Page {
                    shell: &config.index_shell,
                    location: config.page_url(&config.index_shell)?,
                    events: &events,
                    clipboard: None,
                },
            )?;
            write_output(m, &html)
        }
        ("post", Some(m)) => {
            let location = match (m.value_of("url"), m.value_of("slug")) {
                (Some(location), _) => Url::parse(location)?,
                (None, Some(slug)) => {
                    let mut location = config.page_url(&config.post_shell)?;
                    location.query_pairs_mut().append_pair("slug", slug);
                    location
                }
                (None, None) => config.page_url(&config.post_shell)?,
            };
            let mut command = clipboard(&config);
            let clipboard: &mut dyn Clipboard = command.as_mut();
            let html = render_page(
                &config,
                &fetch,
                &mut preferences,
                Page {
                    shell: &config.post_shell,
                    location,
                    events: &[],
                    clipboard: match m.is_present("copy-link") {
                        true => Some(clipboard),
                        false => None,
                    },
                },
            )?;
            write_output(m, &html)
        }
        ("theme", Some(m)) => {
            let mut doc = Document::default();
            let theme = match m.value_of("theme") {
                Some("toggle") => {
                    init_theme(&mut doc, &mut preferences, config.prefers_dark)?;
                    toggle_theme(&mut doc, &mut preferences)?
                }
                Some(name) => {
                    let theme = Theme::parse(name).ok_or_else(|| anyhow!("unknown theme `{}`", name))?;
                    set_theme(&mut doc, &mut preferences, theme)?;
                    theme
                }
                None => init_theme(&mut doc, &mut preferences, config.prefers_dark)?,
            };
            println!("{}", theme);
            Ok(())
        }
        _ => Err(anyhow!("unknown subcommand")),
    }
}

fn output_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("output")
        .long("output")
        .short("o")
        .takes_value(true)
        .help("Writes the page here instead of stdout")
}

fn write_output(m: &ArgMatches, html: &str) -> Result<()> {
    match m.value_of("output") {
        Some(path) => std::fs::write(Path::new(path), html)
            .map_err(|e| anyhow!("Writing `{}`: {}", path, e)),
        None => {
            print!("{}", html);
            Ok(())
        }
    }
}

fn clipboard(config: &Config) -> Box<dyn Clipboard> {
    match &config.clipboard_command {
        Some((program, args)) => Box::new(CommandClipboard::new(program.clone(), args.clone())),
        None => match CommandClipboard::detect() {
            Some(clipboard) => Box::new(clipboard),
            None => Box::new(NoClipboard),
        },
    }
}
