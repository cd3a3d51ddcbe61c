use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dslconsole::config::{self, ConsoleConfig, DEFAULT_INSTANCE};
use dslconsole::render::{self, report_filename};
use dslconsole::{
    LazyRewriter, TerminalPrompter, Vocabulary, init_config_folder, inspect_line,
    open_multi_platform, save_to_file,
};

/// Main entry point for the dslconsole command-line tool.
///
/// Each subcommand handles one statement (or one statement per stdin line) and exits.
fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let vocabulary = match load_vocabulary(matches.get_one::<PathBuf>("vocabulary")) {
        Ok(vocabulary) => vocabulary,
        Err(e) => {
            eprintln!("Error loading vocabulary: {}", e);
            std::process::exit(1);
        }
    };

    let result = match matches.subcommand() {
        Some(("infer", sub)) => run_infer(sub, &vocabulary),
        Some(("inspect", sub)) => run_inspect(sub),
        Some(("terms", sub)) => run_terms(sub, &vocabulary),
        Some(("url", sub)) => run_url(sub, &vocabulary),
        Some(("render", sub)) => run_render(sub),
        Some(("init", sub)) => run_init(sub),
        Some(("read-config", sub)) => run_read_config(sub),
        _ => unreachable!("clap enforces a subcommand"),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    let line_arg = || {
        Arg::new("line")
            .help("DSL statement (reads one statement per line from stdin when omitted)")
            .value_name("LINE")
            .index(1)
    };

    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Console helpers for the search DSL: lazy clause inference and result reports")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("vocabulary")
                .long("vocabulary")
                .help("Vocabulary file (.json, .toml, .yaml) replacing the built-in one")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("infer")
                .about("Fill in lazily omitted clauses")
                .arg(line_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the clauses found in a statement as JSON")
                .arg(line_arg()),
        )
        .subcommand(
            Command::new("terms")
                .about("List vocabulary terms (or the categories when none is given)")
                .arg(
                    Arg::new("category")
                        .help("Vocabulary category, e.g. sources")
                        .value_name("CATEGORY")
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("url")
                .about("Print the web URL of an object")
                .arg(Arg::new("id").value_name("ID").required(true).index(1))
                .arg(
                    Arg::new("type")
                        .help("Object type, e.g. publications")
                        .value_name("TYPE")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Write a JSON query result as an HTML report")
                .arg(
                    Arg::new("query")
                        .long("query")
                        .short('q')
                        .help("The query that produced the result")
                        .value_name("QUERY")
                        .required(true),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("JSON result file (stdin when omitted)")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Directory for the report, created if missing")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("."),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Report file name (derived from the query by default)")
                        .value_name("NAME"),
                )
                .arg(
                    Arg::new("highlight")
                        .long("highlight")
                        .help("Use the static highlight.js page instead of the interactive tree")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("open")
                        .long("open")
                        .help("Open the report once written")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about("Create the credentials file interactively")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .help("Config directory (default ~/.dimensions)")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("read-config")
                .about("Show the connection details of an instance")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("Config file (default ~/.dimensions/dsl.ini)")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("instance")
                        .long("instance")
                        .help("Instance name")
                        .value_name("NAME")
                        .default_value(DEFAULT_INSTANCE),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_vocabulary(path: Option<&PathBuf>) -> Result<Vocabulary, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Vocabulary::load(path)?),
        None => Ok(Vocabulary::builtin()?),
    }
}

/// Apply `handle` to the LINE argument, or to every non-blank stdin line.
fn for_each_line<F>(matches: &ArgMatches, mut handle: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnMut(&str, &mut io::StdoutLock) -> Result<(), Box<dyn std::error::Error>>,
{
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    if let Some(line) = matches.get_one::<String>("line") {
        return handle(line, &mut writer);
    }

    for line_result in io::stdin().lock().lines() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        handle(&line, &mut writer)?;
    }
    Ok(())
}

fn run_infer(matches: &ArgMatches, vocabulary: &Vocabulary) -> Result<(), Box<dyn std::error::Error>> {
    let rewriter = LazyRewriter::new(vocabulary);
    for_each_line(matches, |line, writer| {
        writeln!(writer, "{}", rewriter.infer(line))?;
        Ok(())
    })
}

fn run_inspect(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    for_each_line(matches, |line, writer| {
        writeln!(writer, "{}", serde_json::to_string(&inspect_line(line))?)?;
        Ok(())
    })
}

fn run_terms(matches: &ArgMatches, vocabulary: &Vocabulary) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match matches.get_one::<String>("category") {
        Some(category) => {
            if vocabulary.category(category).is_none() {
                return Err(format!("Unknown vocabulary category '{category}'").into());
            }
            for term in vocabulary.terms(category)? {
                writeln!(writer, "{}", term)?;
            }
        }
        None => {
            for name in vocabulary.category_names() {
                writeln!(writer, "{}", name)?;
            }
        }
    }
    Ok(())
}

fn run_url(matches: &ArgMatches, vocabulary: &Vocabulary) -> Result<(), Box<dyn std::error::Error>> {
    let id = required_str(matches, "id")?;
    let obj_type = required_str(matches, "type")?;

    match vocabulary.dimensions_url(id, obj_type) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => Err(format!("No URL known for object type '{obj_type}'").into()),
    }
}

fn run_render(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let query = required_str(matches, "query")?;

    let mut raw = String::new();
    match matches.get_one::<PathBuf>("json") {
        Some(path) => raw = std::fs::read_to_string(path)?,
        None => {
            io::stdin().lock().read_to_string(&mut raw)?;
        }
    }
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let formatted = serde_json::to_string_pretty(&value)?;

    let page = if matches.get_flag("highlight") {
        render::html_template_highlight(query, &formatted)
    } else {
        render::html_template_interactive(query, &formatted)
    };

    let filename = matches
        .get_one::<String>("name")
        .cloned()
        .unwrap_or_else(|| report_filename(query));
    let dir = matches
        .get_one::<PathBuf>("out")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let url = save_to_file(&page, &filename, &dir)?;
    println!("{}", url);

    if matches.get_flag("open") {
        // a missing viewer is reported, the report itself is already written
        if let Err(e) = open_multi_platform(&dir.join(&filename)) {
            eprintln!("{}", e);
        }
    }
    Ok(())
}

fn run_init(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, file) = match matches.get_one::<PathBuf>("dir") {
        Some(dir) => (dir.clone(), dir.join(config::CONFIG_FILE_NAME)),
        None => config::default_config_paths().ok_or("Could not determine the home directory")?,
    };
    debug!("bootstrapping config in {}", dir.display());

    let mut prompter = TerminalPrompter;
    if let Err(e) = init_config_folder(&dir, &file, &mut prompter) {
        eprintln!("Could not create {}: {}", file.display(), e);
    }
    Ok(())
}

fn run_read_config(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file = match matches.get_one::<PathBuf>("file") {
        Some(file) => file.clone(),
        None => {
            config::default_config_paths()
                .ok_or("Could not determine the home directory")?
                .1
        }
    };
    let name = required_str(matches, "instance")?;

    let config = ConsoleConfig::load(&file)?;
    let instance = config.instance(name)?;
    println!("{}", describe_instance(name, instance, &file));
    Ok(())
}

fn describe_instance(name: &str, instance: &dslconsole::Instance, file: &Path) -> String {
    format!(
        "instance: {}\nfile: {}\nurl: {}\nlogin: {}\npassword: {}",
        name,
        file.display(),
        instance.url,
        instance.login,
        "*".repeat(instance.password.chars().count().min(8))
    )
}

fn required_str<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str, Box<dyn std::error::Error>> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| format!("missing argument '{id}'").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["dslconsole", "infer", "describe", "--verbose"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "infer");
        assert_eq!(sub.get_one::<String>("line").unwrap(), "describe");
    }

    #[test]
    fn test_describe_instance_masks_password() {
        let instance = dslconsole::Instance {
            url: "https://app.dimensions.ai".to_string(),
            login: "me".to_string(),
            password: "secret".to_string(),
        };
        let text = describe_instance("live", &instance, Path::new("dsl.ini"));
        assert!(text.contains("password: ******"));
        assert!(!text.contains("secret"));
    }
}
