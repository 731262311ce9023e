//! Command dispatch: wires parsed arguments to the services.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::{parse_taxon, Rank, RecordTable, StyledTree, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed command.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `scaletree --help`".to_string(),
        ));
    };

    // Completion must work without a readable config.
    if let Commands::Completion { shell } = command {
        return cmd_completion(*shell);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::Tree {
            file,
            leaf_rank,
            family,
            raw,
            format,
        } => cmd_tree(
            &container,
            file,
            *leaf_rank,
            family.as_deref(),
            *raw,
            *format,
        ),
        Commands::Families { file } => cmd_families(&container, file),
        Commands::Lineage {
            file,
            taxon,
            leaf_rank,
        } => cmd_lineage(&container, file, taxon, *leaf_rank),
        Commands::Backbone => cmd_backbone(&container),
        Commands::Config { command } => cmd_config(&container, command, cli.config.as_deref()),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Load records, optionally restricted to a single family.
fn load_table(
    container: &ServiceContainer,
    file: &Path,
    family: Option<&str>,
) -> CliResult<RecordTable> {
    if let Some(raw) = family {
        if parse_taxon(raw).is_none() {
            return Err(CliError::InvalidArgs(format!(
                "--family '{}' does not name a taxon",
                raw
            )));
        }
    }
    let table = container.records.load(file)?;
    let Some(family) = family else {
        return Ok(table);
    };
    let subset = table.retain(Rank::Family, family);
    if subset.is_empty() {
        output::warning(&format!("no records for family '{}'", family));
    }
    Ok(subset)
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    file: &Path,
    leaf_rank: Option<Rank>,
    family: Option<&str>,
    raw: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let table = load_table(container, file, family)?;
    let service = container
        .phylogeny
        .with_leaf_rank(leaf_rank.unwrap_or(container.phylogeny.leaf_rank()));
    debug!("cmd_tree: leaf_rank={}", service.leaf_rank());

    let tree = if raw {
        service.build_unsimplified(&table)
    } else {
        service.build(&table)?
    };

    match format {
        OutputFormat::Json => output::info(&service.to_json(&tree)?),
        OutputFormat::Text => print_text(&tree),
    }
    Ok(())
}

fn print_text(tree: &StyledTree) {
    if tree.graph().is_empty() {
        output::warning("tree is empty");
        return;
    }
    for rendered in tree.to_tree_strings() {
        output::info(&rendered);
    }
}

fn cmd_families(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let table = load_table(container, file, None)?;
    let tree = container.phylogeny.build(&table)?;
    let families = tree.families();
    if families.is_empty() {
        output::warning("no backbone families in tree");
        return Ok(());
    }
    for family in families {
        output::info(family);
    }
    Ok(())
}

fn cmd_lineage(
    container: &ServiceContainer,
    file: &Path,
    taxon: &str,
    leaf_rank: Option<Rank>,
) -> CliResult<()> {
    let table = load_table(container, file, None)?;
    let service = container
        .phylogeny
        .with_leaf_rank(leaf_rank.unwrap_or(container.phylogeny.leaf_rank()));
    let tree = service.build(&table)?;
    let lineage = service.lineage(&tree, taxon)?;

    output::header(&lineage.path.join(" -> "));
    match &lineage.nearest_branch_point {
        Some(node) => output::action("Nearest branch point", node),
        None => output::action("Nearest branch point", "none"),
    }
    Ok(())
}

fn cmd_backbone(container: &ServiceContainer) -> CliResult<()> {
    let trunk = container.phylogeny.trunk();
    for rendered in trunk.to_tree_strings() {
        output::info(&rendered);
    }
    output::action("Families", &trunk.all_fams().join(", "));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    explicit: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail(&"global: (no config directory)"),
            }
            match explicit {
                Some(path) => output::detail(&format!("local:  {}", path.display())),
                None => {
                    let local = std::env::current_dir()
                        .map(|cwd| local_config_path(&cwd))
                        .unwrap_or_else(|_| LOCAL_CONFIG_FILE.into());
                    output::detail(&format!("local:  {}", local.display()));
                }
            }
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
