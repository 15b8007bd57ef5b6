//! `partquote` command-line entry point.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use partquote_app::forms::{PartForm, QuoteForm, RangeForm, VariationForm};
use partquote_app::{AppConfig, Session, script};
use partquote_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "partquote", version, about = "Register priced part types and quote them")]
struct Cli {
    /// Currency symbol for displayed amounts (overrides PARTQUOTE_CURRENCY_SYMBOL).
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Log output format (overrides PARTQUOTE_LOG_FORMAT).
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a JSON action script through one session.
    Run {
        /// Script file, or `-` for stdin.
        script: PathBuf,

        /// Stop at the first failed action and exit with an error status.
        #[arg(long)]
        fail_fast: bool,
    },
    /// Price one ad-hoc part without a script.
    Quote(QuoteArgs),
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Part type name.
    #[arg(long)]
    part: String,

    /// Price range as THRESHOLD=UNIT_PRICE (repeatable, ascending).
    #[arg(long = "range", value_parser = parse_pair, required = true)]
    ranges: Vec<(String, String)>,

    /// Variation as NAME=SURCHARGE (repeatable).
    #[arg(long = "variation", value_parser = parse_pair)]
    variations: Vec<(String, String)>,

    /// Variation to apply (repeatable).
    #[arg(long = "select")]
    selected: Vec<String>,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    quantity: u32,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))
}

fn parse_log_format(raw: &str) -> Result<LogFormat, String> {
    raw.parse()
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "partquote failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(symbol) = &cli.currency {
        config = config.with_currency_symbol(symbol)?;
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    partquote_observability::init_with(&config.log);

    match cli.command {
        Command::Run { script, fail_fast } => run_script(&config, &script, fail_fast, cli.json),
        Command::Quote(args) => quote_once(&config, args, cli.json),
    }
}

fn run_script(
    config: &AppConfig,
    path: &Path,
    fail_fast: bool,
    json: bool,
) -> Result<ExitCode> {
    let source = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?
    };
    let actions = script::parse(&source).context("failed to parse script")?;

    let mut session = Session::new(config);
    let report = script::run(&mut session, &actions, fail_fast);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &report.reports {
            match (&entry.notification, &entry.error) {
                (Some(notification), _) => {
                    println!("#{} {}: {notification}", entry.index, entry.action)
                }
                (None, Some(error)) => println!("#{} {}: {error}", entry.index, entry.action),
                (None, None) => println!("#{} {}: ok", entry.index, entry.action),
            }
            if let Some(listing) = &entry.listing {
                for row in listing {
                    println!(
                        "    {} | {} | {}",
                        row.part_type,
                        row.ranges.join(", "),
                        row.variations.join(", ")
                    );
                }
            }
        }
        println!();
        print!("{}", session.render_listing());
        if let Some(quote) = session.last_quote() {
            println!("Total: {}", session.format_amount(quote.display_total()));
        }
    }

    if fail_fast && report.failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn quote_once(config: &AppConfig, args: QuoteArgs, json: bool) -> Result<ExitCode> {
    let mut session = Session::new(config);

    let form = PartForm {
        part_type: args.part.clone(),
        ranges: args
            .ranges
            .into_iter()
            .map(|(quantity, price)| RangeForm::new(quantity, price))
            .collect(),
        variations: args
            .variations
            .into_iter()
            .map(|(name, surcharge)| VariationForm::new(name, surcharge))
            .collect(),
    };
    session
        .submit_registration(&form)
        .outcome
        .context("invalid part definition")?;

    let submission = session.submit_quote(&QuoteForm::new(args.part, args.quantity, args.selected));
    let quote = submission.outcome.context("quote failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        println!(
            "{} x{} @ {} (tier {}{}) + variations {} = {}",
            quote.part_type,
            quote.quantity,
            session.format_amount(quote.base_price),
            quote.tier.index() + 1,
            if quote.tier.is_fallback() { ", fallback" } else { "" },
            session.format_amount(quote.variation_total),
            session.format_amount(quote.display_total()),
        );
        for name in &quote.unmatched_variations {
            println!("  note: variation {name:?} is not offered for {}", quote.part_type);
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_splits_on_first_equals() {
        assert_eq!(
            parse_pair(" 10 = 5.00 ").unwrap(),
            ("10".to_string(), "5.00".to_string())
        );
        assert_eq!(
            parse_pair("Coat=a=b").unwrap(),
            ("Coat".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("10:5.00").unwrap_err().contains("KEY=VALUE"));
    }

    #[test]
    fn quote_args_parse_repeated_pairs() {
        let cli = Cli::try_parse_from(
            "partquote quote --part Gear --range 10=5.00 --range 50=4.00 \
             --variation Polished=1.50 --select Polished"
                .split_whitespace(),
        )
        .unwrap();
        let Command::Quote(args) = cli.command else {
            panic!("Expected quote subcommand");
        };
        assert_eq!(args.ranges.len(), 2);
        assert_eq!(args.variations[0], ("Polished".to_string(), "1.50".to_string()));
        assert_eq!(args.selected, vec!["Polished"]);
        assert_eq!(args.quantity, 1);
    }

    #[test]
    fn zero_quantity_and_missing_range_are_rejected() {
        let zero = Cli::try_parse_from(
            "partquote quote --part Gear --range 10=5.00 --quantity 0".split_whitespace(),
        );
        assert!(zero.is_err());

        let no_range = Cli::try_parse_from("partquote quote --part Gear".split_whitespace());
        assert!(no_range.is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(
            "partquote run - --fail-fast --currency EUR --log-format text".split_whitespace(),
        )
        .unwrap();
        assert_eq!(cli.currency.as_deref(), Some("EUR"));
        assert_eq!(cli.log_format, Some(LogFormat::Text));
        assert!(matches!(cli.command, Command::Run { fail_fast: true, .. }));
    }
}
