use crate::region;
use crate::text::{self, normalize};
use crate::types::{ClassifiedSite, ContractStage};

/// Site list filter. Every `None` criterion lets all sites through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteFilter {
    pub maintenance_contract: Option<bool>,
    pub stage: Option<ContractStage>,
    /// `Some(true)`: an action is needed; `Some(false)`: nothing to do.
    pub action_needed: Option<bool>,
    pub late_only: bool,
    /// Department code, as produced by [`region::department`].
    pub department: Option<String>,
    /// Accent/case-insensitive search in name, address, contact and brand.
    pub search: Option<String>,
}

impl SiteFilter {
    pub fn late() -> Self {
        SiteFilter { late_only: true, ..SiteFilter::default() }
    }

    pub fn matches(&self, site: &ClassifiedSite) -> bool {
        if let Some(flag) = self.maintenance_contract {
            if site.has_maintenance_contract != flag {
                return false;
            }
        }
        if let Some(stage) = self.stage {
            if site.contract_stage != stage {
                return false;
            }
        }
        if let Some(needed) = self.action_needed {
            if (site.maintenance_needed > 0) != needed {
                return false;
            }
        }
        if self.late_only && !site.is_late {
            return false;
        }
        if let Some(dept) = &self.department {
            if region::department(&site.address) != *dept {
                return false;
            }
        }
        if let Some(query) = &self.search {
            let query = normalize(query);
            if !query.is_empty() {
                let haystack = [&site.site_name, &site.address, &site.contact, &site.brand];
                if !haystack.iter().any(|field| normalize(field).contains(&query)) {
                    return false;
                }
            }
        }
        true
    }

    /// Matching sites, in input order.
    pub fn apply<'a>(&self, sites: &'a [ClassifiedSite]) -> Vec<&'a ClassifiedSite> {
        sites.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Contract stage named by its label, ignoring accents and case
/// ("reconduction", "EXPIRE", "à renseigner").
pub fn stage_from_label(input: &str) -> Option<ContractStage> {
    let wanted = normalize(input);
    ContractStage::ALL
        .into_iter()
        .find(|stage| normalize(stage.label()) == wanted)
}

/// `Some(true)` for oui/o/y/yes, `Some(false)` for non/n/no, `None` otherwise
/// (blank means "any").
pub fn yes_no_answer(input: &str) -> Option<bool> {
    let answer = normalize(input);
    if text::equals_any(&answer, &["oui", "o", "y", "yes"]) {
        Some(true)
    } else if text::equals_any(&answer, &["non", "n", "no"]) {
        Some(false)
    } else {
        None
    }
}
