//! Command-line front-end for casting spells with parameters.
//!
//! Run with: `spell-cli cast fireball --source spellbook --params '{"at": [4, 64, -2]}'`
mod config;
mod logging;
mod session;

use anyhow::Result;
use clap::Parser;
use spell_core::{
    CastEvent, CastReport, CastSource, Caster, RecordingObserver, Spell, SpellCastManager,
    SpellError, SpellParameters,
};

use config::CliConfig;
use session::Session;

/// Cast and inspect parameterized spells
#[derive(Parser)]
#[command(name = "spell-cli")]
#[command(about = "Cast and inspect parameterized spells", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Cast a spell with optional JSON parameters
    Cast {
        /// Spell id, e.g. `fireball`
        spell: String,

        /// Spell level
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,

        /// Channel the cast comes from (spellbook, scroll, sword, command, mob, none)
        #[arg(short, long, default_value = "command", value_parser = parse_source)]
        source: CastSource,

        /// Starting mana of the caster (overrides SPELL_CASTER_MANA)
        #[arg(long)]
        mana: Option<i32>,
    },

    /// Show the parameters a spell accepts
    Describe {
        /// Spell id
        spell: String,
    },

    /// List every spell in the catalog
    List,
}

fn parse_source(raw: &str) -> Result<CastSource, String> {
    raw.parse::<CastSource>()
        .map_err(|_| format!("unknown cast source '{raw}'"))
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = CliConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.clone(), config.session_id.clone())?;

    let mut session = Session::open(&config)?;

    match cli.command {
        Command::Cast {
            spell,
            level,
            params,
            source,
            mana,
        } => cast(&mut session, &spell, level, &params, source, mana.unwrap_or(config.caster_mana)),
        Command::Describe { spell } => describe(&session, &spell),
        Command::List => {
            for spell in session.book.iter() {
                let mode = if spell.definition().parameterized {
                    "parameterized"
                } else {
                    "fixed"
                };
                println!("{:<12} {:<16} {}", spell.id(), spell.name(), mode);
            }
            Ok(())
        }
    }
}

fn cast(
    session: &mut Session,
    spell_id: &str,
    level: u32,
    params: &str,
    source: CastSource,
    mana: i32,
) -> Result<()> {
    let mut caster = session.caster(mana);
    let mut observer = RecordingObserver::new();

    let outcome = {
        let mut manager = SpellCastManager::new(&session.loader, &mut observer).with_source(source);
        manager.cast_spell(&mut session.book, &mut caster, spell_id, level, params)
    };

    for (audience, event) in observer.events() {
        println!("  [{audience}] {}", describe_event(event));
    }

    match outcome {
        Ok(report) => {
            print_report(&report);
            println!("mana: {} -> {}", mana, caster.mana());
            Ok(())
        }
        Err(error) => Err(anyhow::anyhow!(
            "{} ({}, {})",
            error,
            error.error_code(),
            error.phase().as_str()
        )),
    }
}

fn describe(session: &Session, spell_id: &str) -> Result<()> {
    let spell = session
        .book
        .get(spell_id)
        .ok_or_else(|| anyhow::anyhow!("Unknown spell: {}", spell_id))?;

    println!("{} ({})", spell.name(), spell.id());
    if !spell.definition().parameterized {
        println!("  casts with its fixed configuration only");
    }
    print!("{}", spell.schema().usage());
    Ok(())
}

fn describe_event(event: &CastEvent) -> String {
    match event {
        CastEvent::CastStarted {
            spell_id, duration, ..
        } => format!("{} started, {} ticks", spell_id, duration),
        CastEvent::CastFinished {
            spell_id,
            interrupted,
            ..
        } => format!("{} finished, interrupted={}", spell_id, interrupted),
        CastEvent::ManaChanged { mana, .. } => format!("mana now {}", mana),
        CastEvent::EffectReplay { spell_id, data, .. } => {
            match SpellParameters::from_binary(data) {
                Ok(params) => format!("{} effects with {} parameters", spell_id, params.len()),
                Err(error) => format!("{} effects, unreadable payload: {}", spell_id, error),
            }
        }
    }
}

fn print_report(report: &CastReport) {
    println!("{}", report.message);
    if report.fallback {
        return;
    }
    let config = &report.config;
    println!(
        "  level {} | power {} | cast time {} | cooldown {}s",
        report.level,
        config.spell_power(report.level),
        config.cast_time,
        config.cooldown
    );
    if let Some(cost) = report.mana_cost {
        println!("  mana cost {}", cost);
    }
    if let Some(ticks) = report.cooldown_ticks {
        println!("  cooldown {} ticks", ticks);
    }
}
