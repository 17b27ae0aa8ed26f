//! Label resolution against a [`RuleTable`].

use anyhow::Result;
use log::warn;

use crate::error::RepcalcError;
use crate::rules::{RuleMatch, RuleTable};

/// Split a label into class and optional subclass, rejecting a second `/`.
fn split_label(label: &str) -> Result<(&str, Option<&str>)> {
    let mut parts = label.splitn(3, '/');
    let class = parts.next().unwrap_or_default();
    let subclass = parts.next();
    if parts.next().is_some() {
        return Err(RepcalcError::ClassificationFormat {
            label: label.to_string(),
        }
        .into());
    }
    Ok((class, subclass))
}

impl RuleTable {
    /// Find the rule that applies to `label`.
    ///
    /// Explicit rules win over wildcard rules. When a `class/subclass` label
    /// matches both a class-wildcard rule (keyed by its subclass) and a
    /// subclass-wildcard rule (keyed by its class), the class-wildcard rule is
    /// used and a warning is logged.
    pub fn resolve(&self, label: &str) -> Result<RuleMatch<'_>> {
        let label = label.trim();
        let (class, subclass) = split_label(label)?;

        if let Some(replacement) = self.explicit.get(label) {
            return Ok(RuleMatch::Explicit(replacement.as_str()));
        }

        let Some(subclass) = subclass else {
            return Ok(RuleMatch::NoMatch);
        };

        let by_class = self.wildcard_by_class.get(subclass);
        let by_subclass = self.wildcard_by_subclass.get(class);

        Ok(match (by_class, by_subclass) {
            (Some(template), Some(_)) => {
                warn!(
                    "TE label {} matches rules for both class and subclass; \
                     the class wildcard rule takes priority",
                    label
                );
                RuleMatch::WildcardClass(template)
            }
            (Some(template), None) => RuleMatch::WildcardClass(template),
            (None, Some(template)) => RuleMatch::WildcardSubclass(template),
            (None, None) => RuleMatch::NoMatch,
        })
    }

    /// Rewrite `label`, returning it unchanged when no rule applies.
    pub fn rewrite(&self, label: &str) -> Result<String> {
        let label = label.trim();
        Ok(match self.resolve(label)? {
            RuleMatch::Explicit(replacement) => replacement.to_string(),
            RuleMatch::WildcardClass(template) | RuleMatch::WildcardSubclass(template) => {
                let (class, subclass) = split_label(label)?;
                template.substitute(class, subclass.unwrap_or_default())
            }
            RuleMatch::NoMatch => label.to_string(),
        })
    }
}
