use std::collections::BTreeSet;

/// Dotted exclusion paths applied while serializing one record.
///
/// `"missions"` drops the `missions` field of the record itself;
/// `"missions.planet"` keeps the missions but drops `planet` inside each one.
/// Rules are passed explicitly by every caller; nothing is global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    excluded: BTreeSet<String>,
}

impl Rules {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// No exclusions beyond the timestamps, which are always dropped.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn planet() -> Self {
        Self::new(["missions.planet", "scientists.planets"])
    }

    /// Shallow planet listing: no mission collection, and therefore no
    /// derived scientists either.
    pub fn planet_listing() -> Self {
        Self::planet().exclude("missions")
    }

    pub fn scientist() -> Self {
        Self::new(["missions.scientist", "planets.scientists"])
    }

    pub fn mission() -> Self {
        Self::new(["planet.missions", "scientist.missions"])
    }

    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.excluded.insert(path.into());
        self
    }

    /// Whether `field` is dropped at this level.
    pub fn excludes(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }

    /// Rules that apply inside `field`, with the `field.` prefix stripped.
    pub fn descend(&self, field: &str) -> Rules {
        let prefix = format!("{}.", field);
        Rules {
            excluded: self
                .excluded
                .iter()
                .filter_map(|path| path.strip_prefix(&prefix))
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_only_exact_top_level_fields() {
        let rules = Rules::new(["missions.planet"]);
        assert!(!rules.excludes("missions"));
        assert!(!rules.excludes("planet"));
        assert!(Rules::planet_listing().excludes("missions"));
    }

    #[test]
    fn descend_strips_the_prefix() {
        let rules = Rules::new(["missions.planet.missions", "missions.scientist", "planets"]);
        let inner = rules.descend("missions");
        assert!(inner.excludes("scientist"));
        assert!(!inner.excludes("planet"));
        assert!(inner.descend("planet").excludes("missions"));
        assert_eq!(rules.descend("planets"), Rules::none());
    }

    #[test]
    fn descend_does_not_match_partial_names() {
        let rules = Rules::new(["missionsx.planet"]);
        assert_eq!(rules.descend("missions"), Rules::none());
    }
}
