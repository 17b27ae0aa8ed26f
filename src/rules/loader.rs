//! Rule file parser.
//!
//! One rule per line, `match=replacement` or `match:replacement`. Lines that
//! start with `;` or `#` are comments, and either marker also ends the
//! content of a data line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::error::RepcalcError;
use crate::rules::{RuleTable, Template, CLASS_WILDCARD, SUBCLASS_WILDCARD};

const COMMENT_MARKERS: [char; 2] = [';', '#'];

/// Load a rule table from a file.
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open rule file {}", path.display()))?;
    let table = parse_rules(BufReader::new(file), path)?;
    debug!(
        "Loaded {} rules from {} ({} explicit, {} class wildcard, {} subclass wildcard)",
        table.len(),
        path.display(),
        table.explicit.len(),
        table.wildcard_by_class.len(),
        table.wildcard_by_subclass.len()
    );
    Ok(table)
}

/// Parse rules from a reader. `source` names the input in error messages.
pub fn parse_rules<R: BufRead>(reader: R, source: &Path) -> Result<RuleTable> {
    let mut table = RuleTable::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let full_line = line_result
            .with_context(|| format!("Failed to read rule file {}", source.display()))?;

        let trimmed = full_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKERS) {
            continue;
        }

        let bad_line = |reason: &'static str| -> anyhow::Error {
            RepcalcError::ConfigFormat {
                path: source.to_path_buf(),
                line_no,
                line: full_line.clone(),
                reason,
            }
            .into()
        };

        let content = match trimmed.find(COMMENT_MARKERS) {
            Some(pos) => trimmed[..pos].trim(),
            None => trimmed,
        };

        let separator = match (content.contains('='), content.contains(':')) {
            (true, false) => '=',
            (false, true) => ':',
            (true, true) => return Err(bad_line("both '=' and ':' present")),
            (false, false) => return Err(bad_line("missing '=' or ':' separator")),
        };

        let mut terms = content.split(separator);
        let match_term = terms.next().unwrap_or_default().trim();
        let replace_term = terms.next().unwrap_or_default().trim();
        if terms.next().is_some() {
            return Err(bad_line("more than one separator"));
        }
        if match_term.is_empty() {
            return Err(bad_line("empty match term"));
        }
        if replace_term.is_empty() {
            return Err(bad_line("empty replacement term"));
        }

        let match_parts: Vec<&str> = match_term.split('/').map(str::trim).collect();
        let replace_parts: Vec<&str> = replace_term.split('/').map(str::trim).collect();
        if replace_parts.len() > 2 {
            return Err(bad_line("replacement term has more than one '/'"));
        }
        let replacement = replace_parts.join("/");

        match match_parts.as_slice() {
            [single] => {
                table.explicit.insert(single.to_string(), replacement);
            }
            [class, subclass] => {
                let any_class = *class == CLASS_WILDCARD;
                let any_subclass = *subclass == SUBCLASS_WILDCARD;
                match (any_class, any_subclass) {
                    (true, true) => {
                        warn!(
                            "{}:{}: both wildcards '$' and '*' given; rule omitted",
                            source.display(),
                            line_no
                        );
                    }
                    (false, false) => {
                        table
                            .explicit
                            .insert(format!("{class}/{subclass}"), replacement);
                    }
                    (true, false) => {
                        table
                            .wildcard_by_class
                            .insert(subclass.to_string(), Template::new(replace_parts));
                    }
                    (false, true) => {
                        table
                            .wildcard_by_subclass
                            .insert(class.to_string(), Template::new(replace_parts));
                    }
                }
            }
            _ => return Err(bad_line("match term has more than one '/'")),
        }
    }

    Ok(table)
}
