use loader_config::shared::SchemaConfig;

/// Schema names the scripts are written against.
const RAW_GNAF: &str = "raw_gnaf";
const RAW_ADMIN_BDYS: &str = "raw_admin_bdys";
const GNAF: &str = "gnaf";
const ADMIN_BDYS: &str = "admin_bdys";

/// Owner the scripts assign tables to.
const DEFAULT_OWNER: &str = "postgres";

/// Rewrites the canonical schema and owner names in SQL scripts to the configured ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMap {
    pub raw_gnaf: Option<String>,
    pub raw_admin_bdys: Option<String>,
    pub gnaf: Option<String>,
    pub admin_bdys: Option<String>,
    /// Database user the loader connects as.
    pub pg_user: String,
}

impl SchemaMap {
    pub fn new(schemas: &SchemaConfig, pg_user: impl Into<String>) -> Self {
        Self {
            raw_gnaf: schemas.raw_gnaf.clone(),
            raw_admin_bdys: schemas.raw_admin_bdys.clone(),
            gnaf: schemas.gnaf.clone(),
            admin_bdys: schemas.admin_bdys.clone(),
            pg_user: pg_user.into(),
        }
    }

    /// Returns the raw address schema when statements must run with it on the search path.
    pub fn search_path_schema(&self) -> Option<&str> {
        self.raw_gnaf
            .as_deref()
            .filter(|schema| *schema != "public")
    }

    /// Substitutes schema-qualified references and the table owner.
    ///
    /// Only references preceded by a space are rewritten (` raw_gnaf.`), so identifiers that merely
    /// end in a schema name are left alone. Substitutions are applied in order raw address, raw
    /// boundaries, address, boundaries.
    pub fn prep_sql(&self, sql: &str) -> String {
        let mut sql = sql.to_string();

        let schemas = [
            (RAW_GNAF, &self.raw_gnaf),
            (RAW_ADMIN_BDYS, &self.raw_admin_bdys),
            (GNAF, &self.gnaf),
            (ADMIN_BDYS, &self.admin_bdys),
        ];

        for (canonical, configured) in schemas {
            if let Some(configured) = configured {
                sql = sql.replace(&format!(" {canonical}."), &format!(" {configured}."));
            }
        }

        if self.pg_user != DEFAULT_OWNER {
            sql = sql.replace(
                &format!(" {DEFAULT_OWNER};"),
                &format!(" {};", self.pg_user),
            );
        }

        sql
    }

    pub fn prep_sql_list<I, S>(&self, sql_list: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        sql_list
            .into_iter()
            .map(|sql| self.prep_sql(sql.as_ref()))
            .collect()
    }
}
