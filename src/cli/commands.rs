//! Command dispatch: wires settings, services and output together

use std::io::{self, BufRead};
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{export_csv, IoResultExt, LineReport, Outcome, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::TreeRender;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    if !config_dir.is_dir() {
        return Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            config_dir.display()
        )));
    }

    match &cli.command {
        Some(Commands::Config { command }) => _config(command, &config_dir),
        Some(command) => {
            let settings = Settings::load(Some(config_dir.as_path()))?;
            let container = ServiceContainer::new(settings);
            match command {
                Commands::Run {
                    script,
                    keep_going,
                    tree,
                    export,
                } => _run(&container, script, *keep_going, *tree, export.as_deref()),
                Commands::Shell => _shell(&container),
                Commands::Tree { script } => _tree(&container, script),
                Commands::Export { script, output } => {
                    _export(&container, script, output.as_deref())
                }
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
        None => Ok(()),
    }
}

/// Applies a script and returns the session holding its trees.
fn load_session(
    container: &ServiceContainer,
    script: &Path,
    keep_going: bool,
) -> CliResult<(Session, Vec<LineReport>)> {
    let text = container.read_script(script)?;
    let mut session = container.session()?;
    let reports = session.run(&text, keep_going)?;
    Ok((session, reports))
}

#[instrument(skip(container))]
fn _run(
    container: &ServiceContainer,
    script: &Path,
    keep_going: bool,
    show_tree: bool,
    export: Option<&Path>,
) -> CliResult<()> {
    let (session, reports) = load_session(container, script, keep_going)?;

    let mut failed = 0;
    for LineReport { line, result } in &reports {
        match result {
            Ok(outcome) => print_outcome(outcome),
            Err(e) => {
                failed += 1;
                output::failure(&format!("line {}: {}", line, e));
            }
        }
    }
    debug!("run: {} lines, {} failed", reports.len(), failed);

    if show_tree {
        output::info(&session.current_tree()?.to_tree_string());
    }
    if let Some(target) = export {
        let (path, rows) = container.export(session.current_tree()?, target)?;
        output::action("Exported", &format!("{} rows to {}", rows, path.display()));
    }
    if failed > 0 {
        output::warning(&format!("{} of {} operations failed", failed, reports.len()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _shell(container: &ServiceContainer) -> CliResult<()> {
    let mut session = container.session()?;
    let stdin = io::stdin();

    output::header("famtree shell (empty line or EOF quits)");
    let mut line_no = 0;
    loop {
        output::prompt(session.registry().current_name().unwrap_or("famtree"));
        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| InfraError::io("read stdin", e))?;
        if read == 0 || line.trim().is_empty() {
            break;
        }
        line_no += 1;
        match session.execute_line(line_no, line.trim_end()) {
            Ok(Some(outcome)) => print_outcome(&outcome),
            Ok(None) => {}
            Err(e) => output::error(&e),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, script: &Path) -> CliResult<()> {
    let (session, _) = load_session(container, script, false)?;
    output::info(&session.current_tree()?.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn _export(container: &ServiceContainer, script: &Path, target: Option<&Path>) -> CliResult<()> {
    let (session, _) = load_session(container, script, false)?;
    let tree = session.current_tree()?;
    match target {
        Some(target) => {
            let (path, rows) = container.export(tree, target)?;
            output::success(&format!("exported {} rows to {}", rows, path.display()));
        }
        None => {
            let header = container.settings.export.header;
            export_csv(tree, io::stdout().lock(), header)
                .map_err(|e| InfraError::io("write csv to stdout", e))?;
        }
    }
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands, config_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(config_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(config_dir)
            };
            init_config(&path)?;
            output::success(&format!("created {}", path.display()));
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"<unavailable>"),
            }
            output::action("local", &local_config_path(config_dir).display());
        }
    }
    Ok(())
}

fn init_config(path: &Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_path_context("create config directory", parent)?;
    }
    std::fs::write(path, Settings::template()).with_path_context("write config", path)?;
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Applied(msg) => output::success(msg),
        Outcome::Output(text) => output::info(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;

    #[test]
    fn given_existing_config_when_init_then_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = local_config_path(dir.path());
        std::fs::write(&path, "").unwrap();

        let err = init_config(&path).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_fresh_dir_when_init_then_template_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = local_config_path(dir.path());

        init_config(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, Settings::template());
    }

    #[test]
    fn given_missing_script_when_loading_session_then_io_failure() {
        let container = ServiceContainer::new(Settings::default());
        let err = load_session(&container, Path::new("/nonexistent/famtree.script"), false)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CliError::Infra(InfraError::Application(ApplicationError::OperationFailed { .. }))
        ));
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }
}
