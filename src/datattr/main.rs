use clap::Parser;
use colored::*;
use datattr::config::DatattrConfig;
use datattr::{
    install, normalize, Binding, DatattrError, Directive, DirectiveBinding, DirectiveRegistry,
    ElementAttributes, Modifiers, Result, SyncReport, Value,
};
use directories::ProjectDirs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    config: DatattrConfig,
    config_dir: PathBuf,
    verbose: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Apply {
            binding,
            old,
            name,
            empty,
            bools,
            modifiers,
        } => {
            let overrides = Modifiers {
                name,
                empty: empty.then_some(true),
                bools: bools.then_some(true),
            };
            handle_apply(&ctx, &binding, old.as_deref(), overrides, &modifiers)
        }
        Commands::Normalize {
            value,
            empty,
            bools,
        } => {
            let overrides = Modifiers {
                name: None,
                empty: empty.then_some(true),
                bools: bools.then_some(true),
            };
            handle_normalize(&ctx, &value, overrides)
        }
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("datattr=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = if cli.global {
        ProjectDirs::from("com", "datattr", "datattr")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| DatattrError::Api("Could not determine config dir".into()))?
    } else {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(".datattr")
    };
    let config = DatattrConfig::load(&config_dir)?;

    Ok(AppContext {
        config,
        config_dir,
        verbose: cli.verbose,
    })
}

fn handle_apply(
    ctx: &AppContext,
    source: &str,
    old: Option<&Path>,
    overrides: Modifiers,
    flags: &[String],
) -> Result<()> {
    let binding = Binding::from_json_str(&read_source(source)?)?;
    let old_binding = old
        .map(|path| Binding::from_json_str(&std::fs::read_to_string(path)?))
        .transpose()?;

    let mut host = DirectiveRegistry::new();
    let options = install(&mut host, ctx.config.options().merged(&overrides))?;
    let directive = host
        .get(&options.name)
        .ok_or_else(|| DatattrError::Api(format!("Directive {} not installed", options.name)))?;

    let mut element = ElementAttributes::new();
    let mut call = DirectiveBinding::new(binding).with_modifiers(Modifiers::from_flags(flags));
    if let Some(old_binding) = old_binding {
        directive.update(&mut element, &DirectiveBinding::new(old_binding.clone()))?;
        call = call.with_old_value(old_binding);
    }
    let report = directive.update(&mut element, &call)?;

    print_attributes(&element);
    if ctx.verbose {
        print_skipped(&report);
    }
    Ok(())
}

fn handle_normalize(ctx: &AppContext, raw: &str, overrides: Modifiers) -> Result<()> {
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from_json(json)?,
        Err(_) => Value::String(raw.to_string()),
    };
    let options = ctx.config.options().merged(&overrides);

    match normalize(&value, &options) {
        Some(text) => {
            println!("{}", text);
            if ctx.verbose && text.is_empty() && !options.empty {
                println!("{}", "(would be skipped)".dimmed());
            }
        }
        None => println!("{}", "<empty>".dimmed()),
    }
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in datattr::config::CONFIG_KEYS {
                println!("{} = {}", key, ctx.config.get(key)?);
            }
        }
        (Some(key), None) => println!("{}", ctx.config.get(&key)?),
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value)?;
            ctx.config.save(&ctx.config_dir)?;
            println!(
                "{}",
                format!("Set {} = {}", key, ctx.config.get(&key)?).green()
            );
        }
    }
    Ok(())
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(input);
    }
    Ok(std::fs::read_to_string(source)?)
}

fn print_attributes(element: &ElementAttributes) {
    if element.is_empty() {
        println!("{}", "No attributes set.".dimmed());
        return;
    }
    for (name, value) in element.iter() {
        println!("{}=\"{}\"", name.cyan(), escape_attribute(value));
    }
}

fn print_skipped(report: &SyncReport) {
    for key in &report.skipped {
        println!("{}", format!("Skipped empty value: {}", key).dimmed());
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
