// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask <command>` runs the checks CI runs: clippy, rustfmt, docs,
//! unused-dependency detection, tests and the migration reversibility check.
//!
//! ### Migration Verification
//!
//! - `cargo test` runs every migration forward against in-memory `SQLite`
//! - `cargo xtask verify-migrations` also reverts them all, re-applies them
//!   and requires the second schema to match the first

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::BTreeMap;
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Nullable, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Everything CI runs, in order
    CI,

    /// Build all targets
    #[command(visible_alias = "b")]
    Build,

    /// Type-check all targets
    #[command(visible_alias = "c")]
    Check,

    /// Write an lcov report to target/lcov.info
    #[command(visible_alias = "cov")]
    Coverage,

    /// Report dependencies no crate uses
    #[command(visible_alias = "m")]
    Machete,

    /// Clippy, docs and formatting
    #[command(visible_alias = "l")]
    Lint,

    /// Clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build docs for the default members with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// Fail if any file is not rustfmt-clean
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Apply rustfmt
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Unit, integration and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Check that the migration set reverts and re-applies to the same schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => {
                lint()?;
                machete()?;
                cargo(&["build", "--all-targets", "--all-features"])?;
                test()?;
                verify_migrations()
            }
            Self::Build => cargo(&["build", "--all-targets", "--all-features"]),
            Self::Check => cargo(&["check", "--all-targets", "--all-features"]),
            Self::Coverage => cargo(&[
                "llvm-cov",
                "--lcov",
                "--output-path",
                "target/lcov.info",
                "--all-features",
            ]),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => clippy(false),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => cargo_nightly(&["fmt", "--all", "--check"]),
            Self::FixClippy => clippy(true),
            Self::FixFormatting => cargo_nightly(&["fmt", "--all"]),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn lint() -> Result<()> {
    clippy(false)?;
    lint_docs()?;
    cargo_nightly(&["fmt", "--all", "--check"])
}

fn clippy(fix: bool) -> Result<()> {
    let mut args: Vec<&str> = vec!["clippy", "--all-targets", "--all-features"];
    if fix {
        args.extend(["--fix", "--allow-dirty", "--allow-staged"]);
    }
    args.extend(["--", "-D", "warnings"]);
    cargo(&args)
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Builds each default member's docs the way docs.rs would.
fn lint_docs() -> Result<()> {
    let metadata = MetadataCommand::new()
        .exec()
        .wrap_err("failed to read cargo metadata")?;

    for package in metadata.workspace_default_packages() {
        let name: &str = &package.name;
        cmd!("cargo", "doc", "--no-deps", "--all-features", "--package", name)
            .env_remove("CARGO")
            .env("RUSTUP_TOOLCHAIN", "nightly")
            .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
            .run_with_trace()?;
    }
    Ok(())
}

fn test() -> Result<()> {
    cargo(&["test", "--all-targets", "--all-features"])?;
    // Doc tests are slow; keep them last.
    cargo(&["test", "--doc", "--all-features"])
}

fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // Set by the outer cargo; it would pin the stable toolchain.
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Schema objects keyed by `(type, name)`, valued by their `CREATE` text.
type Schema = BTreeMap<(String, String), Option<String>>;

#[derive(QueryableByName)]
struct SchemaObject {
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Nullable<Text>)]
    sql: Option<String>,
}

/// Reads every user table, index and trigger from `sqlite_master`.
fn read_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    let objects: Vec<SchemaObject> = diesel::sql_query(
        "SELECT type, name, sql FROM sqlite_master \
         WHERE name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations'",
    )
    .load(conn)
    .wrap_err("failed to read sqlite_master")?;

    Ok(objects
        .into_iter()
        .map(|object| ((object.r#type, object.name), object.sql))
        .collect())
}

/// Applies every migration to a fresh in-memory database, reverts them all,
/// then applies them again.
///
/// Fails if a migration fails in either direction, if anything survives the
/// revert, or if the re-applied schema differs from the first.
fn verify_migrations() -> Result<()> {
    tracing::info!("Checking migration reversibility");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("failed to open in-memory SQLite database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("failed to enable foreign keys")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to apply migrations: {e}"))?;
    let applied: Schema = read_schema(&mut conn)?;
    tracing::info!(objects = applied.len(), "Migrations applied");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to revert migrations: {e}"))?;
    let leftover: Schema = read_schema(&mut conn)?;
    if !leftover.is_empty() {
        let names: Vec<&String> = leftover.keys().map(|(_, name)| name).collect();
        return Err(eyre!("objects left after revert: {names:?}"));
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to re-apply migrations: {e}"))?;
    let reapplied: Schema = read_schema(&mut conn)?;

    let differences: Vec<String> = diff_schemas(&applied, &reapplied);
    if differences.is_empty() {
        tracing::info!("✓ Migrations revert and re-apply cleanly");
        return Ok(());
    }
    for difference in &differences {
        tracing::error!("{difference}");
    }
    Err(eyre!("{} schema difference(s) after re-apply", differences.len()))
}

fn diff_schemas(first: &Schema, second: &Schema) -> Vec<String> {
    let mut differences: Vec<String> = Vec::new();
    for ((kind, name), sql) in first {
        match second.get(&(kind.clone(), name.clone())) {
            None => differences.push(format!("{kind} {name} missing after re-apply")),
            Some(other) if other != sql => {
                differences.push(format!("{kind} {name} changed: {sql:?} vs {other:?}"));
            }
            Some(_) => {}
        }
    }
    for (kind, name) in second.keys() {
        if !first.contains_key(&(kind.clone(), name.clone())) {
            differences.push(format!("{kind} {name} only present after re-apply"));
        }
    }
    differences
}

/// Logs a `duct` command before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // Output may have scrolled the command away; repeat it.
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
