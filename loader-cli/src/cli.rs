use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gnaf-loader",
    about = "Loads address and boundary data into PostgreSQL in parallel"
)]
pub(crate) struct Cli {
    /// Number of parallel jobs, overriding `max_processes` from the configuration
    #[arg(long, global = true)]
    pub(crate) max_processes: Option<u16>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run SQL files, one job per file or per key range when splitting
    Sql(SqlArgs),
    /// Run shell commands from a file, one job per line
    Commands(CommandsArgs),
    /// Import shapefiles with shp2pgsql
    Shapefiles(ShapefilesArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SqlArgs {
    /// SQL files, relative to the configured `sql_dir`
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,

    /// Split every statement over the key range of this table (`schema.table`)
    #[arg(long, requires = "alias")]
    pub(crate) split: Option<String>,

    /// Alias of the split table inside the statements
    #[arg(long, requires = "split")]
    pub(crate) alias: Option<String>,

    /// Integer key column of the split table
    #[arg(long, default_value = "gid")]
    pub(crate) gid: String,
}

#[derive(Debug, Args)]
pub(crate) struct CommandsArgs {
    /// File with one command per line; blank lines and `#` comments are skipped
    pub(crate) file: PathBuf,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["manifest", "dir"])))]
pub(crate) struct ShapefilesArgs {
    /// YAML or JSON file listing the shapefiles to import
    #[arg(long)]
    pub(crate) manifest: Option<PathBuf>,

    /// Import every `.shp` file below this directory
    #[arg(long, requires = "schema")]
    pub(crate) dir: Option<PathBuf>,

    /// Target schema for `--dir` imports
    #[arg(long)]
    pub(crate) schema: Option<String>,

    /// Append to existing tables instead of replacing them
    #[arg(long)]
    pub(crate) append: bool,

    /// Only load attributes, skipping geometries
    #[arg(long)]
    pub(crate) non_spatial: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_split_sql() {
        let cli = Cli::try_parse_from([
            "gnaf-loader",
            "--max-processes",
            "8",
            "sql",
            "03-07-reference-tables.sql",
            "--split",
            "gnaf.address_principals",
            "--alias",
            "pnt",
        ])
        .unwrap();

        assert_eq!(cli.max_processes, Some(8));
        let Command::Sql(args) = cli.command else {
            panic!("expected the sql command");
        };
        assert_eq!(args.split.as_deref(), Some("gnaf.address_principals"));
        assert_eq!(args.alias.as_deref(), Some("pnt"));
        assert_eq!(args.gid, "gid");
    }

    #[test]
    fn split_requires_alias() {
        let result = Cli::try_parse_from(["gnaf-loader", "sql", "a.sql", "--split", "gnaf.address"]);

        assert!(result.is_err());
    }

    #[test]
    fn shapefiles_require_a_source() {
        assert!(Cli::try_parse_from(["gnaf-loader", "shapefiles"]).is_err());
        assert!(Cli::try_parse_from(["gnaf-loader", "shapefiles", "--dir", "data"]).is_err());
        assert!(
            Cli::try_parse_from([
                "gnaf-loader",
                "shapefiles",
                "--manifest",
                "jobs.yaml",
                "--dir",
                "data",
            ])
            .is_err()
        );
    }

    #[test]
    fn parses_directory_import() {
        let cli = Cli::try_parse_from([
            "gnaf-loader",
            "shapefiles",
            "--dir",
            "data/admin-bdys",
            "--schema",
            "raw_admin_bdys",
            "--append",
        ])
        .unwrap();

        let Command::Shapefiles(args) = cli.command else {
            panic!("expected the shapefiles command");
        };
        assert_eq!(args.dir, Some(PathBuf::from("data/admin-bdys")));
        assert!(args.append);
        assert!(!args.non_spatial);
    }
}
