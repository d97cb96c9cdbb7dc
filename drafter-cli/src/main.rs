//! Drafter CLI
//!
//! Inspect stylesheets the way the style engine sees them: tokens, selector
//! specificity, recoverable errors, and the styled properties of a figure.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use drafter_css::cascade::{DeclaredValue, StyledProperty};
use drafter_css::tokenizer::tokenize;
use drafter_css::{
    ParserConfig, PseudoClassStates, Selector, StyleError, StyleOrigin, StylesheetsManager,
    parse_selector_group, parse_stylesheet,
};
use drafter_figure::{FigureId, FigureKind, FigureSelectorModel, FigureTree, registry_for};
use owo_colors::OwoColorize;
use serde::Serialize;
use simple_logger::SimpleLogger;
use strum::IntoEnumIterator;

/// Drafter - CSS selector matching and cascade for structured drawings
#[derive(Parser, Debug)]
#[command(name = "drafter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show the tokens of a stylesheet
    drafter tokens theme.css

    # Show the specificity of each selector in a group
    drafter selectors 'layer > rect.selected, #frame'

    # Report parse errors and values no figure accepts
    drafter check theme.css

    # Style a rect with class "selected" and print its properties
    drafter style theme.css --kind rect --class selected --json
"#)]
struct Cli {
    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Cascade origin of the stylesheets read from files
    #[arg(long, default_value = "author", global = true)]
    origin: StyleOrigin,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of a stylesheet with their positions
    Tokens {
        /// Stylesheet file, or `-` for standard input
        #[arg(value_name = "FILE")]
        input: String,
    },

    /// Parse a selector group and print each selector's specificity
    Selectors {
        /// The selector group, e.g. `group > rect, .selected`
        #[arg(value_name = "SELECTORS")]
        text: String,
    },

    /// Parse a stylesheet and report everything that would be skipped
    Check {
        /// Stylesheet file, or `-` for standard input
        #[arg(value_name = "FILE")]
        input: String,
    },

    /// Style one figure inside `drawing > layer` and print its properties
    Style {
        /// Stylesheet files, applied in order
        #[arg(value_name = "FILE", required = true)]
        stylesheets: Vec<PathBuf>,

        /// The figure's kind
        #[arg(long, default_value = "rect")]
        kind: FigureKind,

        /// The figure's id
        #[arg(long)]
        id: Option<String>,

        /// A style class of the figure (repeatable)
        #[arg(long = "class", value_name = "CLASS")]
        classes: Vec<String>,

        /// A pseudo-class state of the figure, such as `hover` (repeatable)
        #[arg(long = "state", value_name = "STATE")]
        states: Vec<String>,

        /// Inline style declarations of the figure
        #[arg(long = "inline", value_name = "DECLARATIONS")]
        inline: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    match cli.command {
        Command::Tokens { ref input } => print_tokens(&read_input(input)?, cli.json),
        Command::Selectors { ref text } => print_selectors(text, cli.json),
        Command::Check { ref input } => check(input, &read_input(input)?, cli.origin, cli.json),
        Command::Style {
            ref stylesheets,
            kind,
            ref id,
            ref classes,
            ref states,
            ref inline,
        } => {
            let target = FigureSpec {
                kind,
                id: id.as_deref(),
                classes,
                states,
                inline: inline.as_deref(),
            };
            style(stylesheets, cli.origin, &target, cli.json)
        }
    }
}

/// Read a file, or standard input for `-`.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        let _ = io::stdin()
            .read_to_string(&mut text)
            .context("reading standard input")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("reading '{input}'"))
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_tokens(text: &str, json: bool) -> Result<()> {
    let tokens = tokenize(text);
    if json {
        return print_json(&tokens);
    }
    println!("=== Tokens ({}) ===", tokens.len());
    for located in &tokens {
        println!("  {:>8}  {}", located.position.to_string().dimmed(), located.token);
    }
    Ok(())
}

#[derive(Serialize)]
struct SelectorReport {
    selector: String,
    specificity: [u32; 3],
}

fn selector_report(selector: &Selector) -> SelectorReport {
    let specificity = selector.specificity();
    SelectorReport {
        selector: selector.to_string(),
        specificity: [specificity.0, specificity.1, specificity.2],
    }
}

fn print_selectors(text: &str, json: bool) -> Result<()> {
    let group = parse_selector_group(text);
    if group.is_nothing() {
        bail!("'{text}' is not a valid selector");
    }
    let reports: Vec<SelectorReport> = group.selectors.iter().map(selector_report).collect();
    if json {
        return print_json(&reports);
    }
    for (report, selector) in reports.iter().zip(&group.selectors) {
        if matches!(selector, Selector::Nothing) {
            println!("  {}  {}", "invalid".red(), "(never matches)".dimmed());
        } else {
            println!("  {}  {}", selector.specificity().cyan(), report.selector);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Problem {
    line: usize,
    column: usize,
    severity: &'static str,
    message: String,
}

/// Validate one declaration against every figure kind that has the property.
/// `None` when at least one kind accepts the value.
fn declaration_problem(namespace: Option<&str>, name: &str, value: &[drafter_css::LocatedToken]) -> Option<String> {
    let mut first_error = None;
    let mut known = false;
    for kind in FigureKind::iter() {
        let Some(key) = registry_for(kind).find(namespace, name) else {
            continue;
        };
        known = true;
        match DeclaredValue::parse(&key, value) {
            Ok(_) => return None,
            Err(error) => {
                let _ = first_error.get_or_insert_with(|| error.to_string());
            }
        }
    }
    if known {
        first_error
    } else {
        Some(format!("no figure has a property '{name}'"))
    }
}

fn check(input: &str, text: &str, origin: StyleOrigin, json: bool) -> Result<()> {
    let config = ParserConfig::with_origin(origin).source(input);
    let stylesheet = parse_stylesheet(text, config);

    let mut problems: Vec<Problem> = stylesheet
        .errors
        .iter()
        .map(|error| Problem {
            line: error.position.line,
            column: error.position.column,
            severity: "error",
            message: error.message.clone(),
        })
        .collect();

    for rule in stylesheet.style_rules() {
        for declaration in &rule.declarations {
            if let Some(message) = declaration_problem(
                declaration.namespace.as_deref(),
                &declaration.name,
                &declaration.value,
            ) {
                problems.push(Problem {
                    line: declaration.position.line,
                    column: declaration.position.column,
                    severity: "warning",
                    message,
                });
            }
        }
    }
    problems.sort_by_key(|p| (p.line, p.column));

    if json {
        print_json(&problems)?;
    } else {
        for problem in &problems {
            let severity = if problem.severity == "error" {
                problem.severity.red().bold().to_string()
            } else {
                problem.severity.yellow().bold().to_string()
            };
            println!("{input}:{}:{}: {severity}: {}", problem.line, problem.column, problem.message);
        }
        println!(
            "{} rules, {} problems",
            stylesheet.rules.len(),
            problems.len()
        );
    }

    if problems.iter().any(|p| p.severity == "error") {
        bail!("{input} has parse errors");
    }
    Ok(())
}

/// The figure `drafter style` builds.
struct FigureSpec<'a> {
    kind: FigureKind,
    id: Option<&'a str>,
    classes: &'a [String],
    states: &'a [String],
    inline: Option<&'a str>,
}

/// Build `drawing > layer > figure` and return the tree and the figure.
fn build_tree(spec: &FigureSpec<'_>) -> (FigureTree, FigureId) {
    let mut tree = FigureTree::new();
    let layer = tree.add(tree.root(), FigureKind::Layer);
    let figure = tree.add(layer, spec.kind);
    if let Some(id) = spec.id {
        tree.set_id(figure, id);
    }
    for class in spec.classes {
        let _ = tree.add_style_class(figure, class);
    }
    tree.set_inline_style(figure, spec.inline);
    (tree, figure)
}

#[derive(Serialize)]
struct StyleReport<'a> {
    kind: FigureKind,
    errors: &'a [StyleError],
    properties: &'a [StyledProperty],
}

fn style(stylesheets: &[PathBuf], origin: StyleOrigin, spec: &FigureSpec<'_>, json: bool) -> Result<()> {
    let mut manager = StylesheetsManager::new();
    for path in stylesheets {
        let text = fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))?;
        let config = ParserConfig::with_origin(origin).source(path.display().to_string());
        let sheet = manager.add_css(&text, config);
        log::info!("{}: {} rules", path.display(), sheet.rules.len());
    }

    let (tree, figure) = build_tree(spec);
    let mut states = PseudoClassStates::new();
    for state in spec.states {
        let _ = states.insert(state, figure);
    }

    let mut model = FigureSelectorModel::new(tree);
    let errors = model.style_tree(&manager, &states);
    let properties = model.snapshot(figure);

    if json {
        return print_json(&StyleReport {
            kind: spec.kind,
            errors: &errors,
            properties: &properties,
        });
    }

    for error in &errors {
        eprintln!("{}: {error}", "skipped".yellow());
    }
    println!("=== {} ===", spec.kind.bold());
    let width = properties.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for property in &properties {
        let origin = property
            .origin
            .map_or_else(|| "initial".dimmed().to_string(), |o| o.green().to_string());
        println!("  {:width$}  {}  {origin}", property.name, property.value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_problem_accepts_value_of_any_kind() {
        let tokens = tokenize("red");
        assert_eq!(declaration_problem(None, "fill", &tokens), None);
    }

    #[test]
    fn test_declaration_problem_unknown_property() {
        let tokens = tokenize("1");
        let message = declaration_problem(None, "no-such-thing", &tokens);
        assert!(message.is_some_and(|m| m.contains("no-such-thing")));
    }

    #[test]
    fn test_declaration_problem_bad_value() {
        let tokens = tokenize("2");
        assert!(declaration_problem(None, "opacity", &tokens).is_some());
    }

    #[test]
    fn test_declaration_problem_wide_keywords() {
        let tokens = tokenize("inherit");
        assert_eq!(declaration_problem(None, "stroke", &tokens), None);
    }

    #[test]
    fn test_style_applies_classes_and_inline() {
        let classes = vec!["selected".to_owned()];
        let spec = FigureSpec {
            kind: FigureKind::Rect,
            id: Some("frame"),
            classes: &classes,
            states: &[],
            inline: Some("stroke-width: 3"),
        };
        let (tree, figure) = build_tree(&spec);
        let mut manager = StylesheetsManager::new();
        let _ = manager.add_css(
            "layer > rect.selected { fill: red } #frame { opacity: 0.5 }",
            ParserConfig::default(),
        );
        let mut model = FigureSelectorModel::new(tree);
        let errors = model.style_tree(&manager, &PseudoClassStates::new());
        assert!(errors.is_empty(), "{errors:?}");

        let properties = model.snapshot(figure);
        let value = |name: &str| {
            properties
                .iter()
                .find(|p| p.name == name)
                .map(|p| (p.value.clone(), p.origin))
        };
        assert_eq!(value("opacity"), Some(("0.5".to_owned(), Some(StyleOrigin::Author))));
        assert_eq!(value("stroke-width"), Some(("3".to_owned(), Some(StyleOrigin::Author))));
        assert_eq!(value("arc").map(|(_, origin)| origin), Some(None));
    }

    #[test]
    fn test_cli_parses_style_command() {
        let cli = Cli::try_parse_from([
            "drafter", "style", "a.css", "--kind", "ellipse", "--class", "x", "--class", "y",
            "--origin", "user",
        ]);
        let Ok(cli) = cli else {
            panic!("style command did not parse");
        };
        assert_eq!(cli.origin, StyleOrigin::User);
        match cli.command {
            Command::Style { kind, classes, .. } => {
                assert_eq!(kind, FigureKind::Ellipse);
                assert_eq!(classes, vec!["x", "y"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
