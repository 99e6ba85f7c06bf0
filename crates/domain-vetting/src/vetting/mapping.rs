use super::normalizer::normalize_header;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Fixed schema every export is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Target,
    Dr,
    OrganicTraffic,
    RefdomainsAll,
    RefdomainsFollowed,
    RefdomainsNofollowed,
    BacklinksAll,
    BacklinksFollowed,
    BacklinksNofollow,
    RefIps,
    RefSubnets,
    DomainAge,
    PctAuthorityTlds,
    PctBrandAnchors,
    UrlRating,
    AhrefsRank,
    OrganicKeywords,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 17] = [
        CanonicalField::Target,
        CanonicalField::Dr,
        CanonicalField::OrganicTraffic,
        CanonicalField::RefdomainsAll,
        CanonicalField::RefdomainsFollowed,
        CanonicalField::RefdomainsNofollowed,
        CanonicalField::BacklinksAll,
        CanonicalField::BacklinksFollowed,
        CanonicalField::BacklinksNofollow,
        CanonicalField::RefIps,
        CanonicalField::RefSubnets,
        CanonicalField::DomainAge,
        CanonicalField::PctAuthorityTlds,
        CanonicalField::PctBrandAnchors,
        CanonicalField::UrlRating,
        CanonicalField::AhrefsRank,
        CanonicalField::OrganicKeywords,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CanonicalField::Target => "target",
            CanonicalField::Dr => "dr",
            CanonicalField::OrganicTraffic => "organic_traffic",
            CanonicalField::RefdomainsAll => "refdomains_all",
            CanonicalField::RefdomainsFollowed => "refdomains_followed",
            CanonicalField::RefdomainsNofollowed => "refdomains_nofollowed",
            CanonicalField::BacklinksAll => "backlinks_all",
            CanonicalField::BacklinksFollowed => "backlinks_followed",
            CanonicalField::BacklinksNofollow => "backlinks_nofollow",
            CanonicalField::RefIps => "ref_ips",
            CanonicalField::RefSubnets => "ref_subnets",
            CanonicalField::DomainAge => "domain_age",
            CanonicalField::PctAuthorityTlds => "pct_authority_tlds",
            CanonicalField::PctBrandAnchors => "pct_brand_anchors",
            CanonicalField::UrlRating => "url_rating",
            CanonicalField::AhrefsRank => "ahrefs_rank",
            CanonicalField::OrganicKeywords => "organic_keywords",
        }
    }

    /// Accepted spellings in priority order, as they appear in common SEO tool exports.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Target => &["Target", "target", "domain", "url"],
            CanonicalField::Dr => &[
                "Domain Rating",
                "DR",
                "domain rating",
                "Domain Authority",
                "DA",
            ],
            CanonicalField::OrganicTraffic => &[
                "Organic / Traffic",
                "Organic Traffic",
                "Traffic",
                "Organic search",
            ],
            CanonicalField::RefdomainsAll => {
                &["Ref. domains / All", "Referring domains", "ref domains"]
            }
            CanonicalField::RefdomainsFollowed => &["Ref. domains / Followed", "followed"],
            CanonicalField::RefdomainsNofollowed => {
                &["Ref. domains / Not followed", "Ref Domains Nofollow"]
            }
            CanonicalField::BacklinksAll => &["Backlinks / All", "Backlinks", "backlinks"],
            CanonicalField::BacklinksFollowed => &["Backlinks / Followed"],
            CanonicalField::BacklinksNofollow => &[
                "Backlinks / Not followed",
                "Backlinks / Nofollow",
                "Nofollow Backlinks",
            ],
            CanonicalField::RefIps => &["Ref. IPs / IPs", "Ref IPs"],
            CanonicalField::RefSubnets => &["Ref. IPs / Subnets", "subnets"],
            CanonicalField::DomainAge => &["Domain Age", "Age", "Created", "Creation Date"],
            CanonicalField::PctAuthorityTlds => {
                &["Authority TLDs", "EduGov Links", "Educational Links"]
            }
            CanonicalField::PctBrandAnchors => {
                &["Brand Anchors", "Branded Anchors", "Anchor Brand"]
            }
            CanonicalField::UrlRating => &["URL Rating", "UR", "url_rating"],
            CanonicalField::AhrefsRank => &["Ahrefs Rank", "ahrefs_rank"],
            CanonicalField::OrganicKeywords => {
                &["Organic / Total Keywords", "Keywords", "organic_keywords"]
            }
        }
    }

    fn normalized_aliases(self) -> &'static [String] {
        static ALIASES: OnceLock<BTreeMap<CanonicalField, Vec<String>>> = OnceLock::new();
        ALIASES
            .get_or_init(|| {
                CanonicalField::ALL
                    .iter()
                    .map(|field| {
                        let aliases = field
                            .aliases()
                            .iter()
                            .map(|alias| normalize_header(alias))
                            .collect();
                        (*field, aliases)
                    })
                    .collect()
            })
            .get(&self)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Canonical field to source column resolution for one record set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    resolved: BTreeMap<CanonicalField, usize>,
    columns: Vec<String>,
}

impl ColumnMapping {
    /// Two passes: exact alias matches for every field first, then substring
    /// containment for the fields still unresolved. A column that is an exact
    /// match for one field is never handed to another field by substring.
    pub fn resolve(columns: &[String]) -> Self {
        let normalized: Vec<String> = columns.iter().map(|c| normalize_header(c)).collect();
        let mut resolved = BTreeMap::new();

        for field in CanonicalField::ALL {
            if let Some(index) = exact_match(&normalized, field.normalized_aliases()) {
                resolved.insert(field, index);
            }
        }

        let claimed: HashSet<usize> = resolved.values().copied().collect();
        for field in CanonicalField::ALL {
            if resolved.contains_key(&field) {
                continue;
            }
            if let Some(index) =
                substring_match(&normalized, field.normalized_aliases(), &claimed)
            {
                resolved.insert(field, index);
            }
        }

        Self {
            resolved,
            columns: columns.to_vec(),
        }
    }

    pub fn column_index(&self, field: CanonicalField) -> Option<usize> {
        self.resolved.get(&field).copied()
    }

    pub fn column_name(&self, field: CanonicalField) -> Option<&str> {
        self.column_index(field)
            .and_then(|index| self.columns.get(index))
            .map(String::as_str)
    }

    pub fn unresolved(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|field| !self.resolved.contains_key(field))
            .collect()
    }
}

fn exact_match(columns: &[String], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| columns.iter().position(|column| column == alias))
}

fn substring_match(columns: &[String], aliases: &[String], claimed: &HashSet<usize>) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        columns
            .iter()
            .enumerate()
            .find(|(index, column)| !claimed.contains(index) && column.contains(alias.as_str()))
            .map(|(index, _)| index)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn exact_aliases_resolve_ahrefs_headers() {
        let mapping = ColumnMapping::resolve(&headers(&["Domain Rating", "Ref. domains / All"]));

        assert_eq!(mapping.column_name(CanonicalField::Dr), Some("Domain Rating"));
        assert_eq!(
            mapping.column_name(CanonicalField::RefdomainsAll),
            Some("Ref. domains / All")
        );
        assert_eq!(mapping.column_index(CanonicalField::Target), None);
    }

    #[test]
    fn substring_fallback_resolves_variant_headers() {
        let mapping = ColumnMapping::resolve(&headers(&["dr_score"]));
        assert_eq!(mapping.column_name(CanonicalField::Dr), Some("dr_score"));
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let mapping = ColumnMapping::resolve(&headers(&["  TARGET ", "organic TRAFFIC"]));
        assert_eq!(mapping.column_index(CanonicalField::Target), Some(0));
        assert_eq!(mapping.column_index(CanonicalField::OrganicTraffic), Some(1));
    }

    #[test]
    fn exact_match_beats_earlier_substring_candidate() {
        let mapping = ColumnMapping::resolve(&headers(&["Backlinks / All (trend)", "Backlinks"]));
        assert_eq!(mapping.column_name(CanonicalField::BacklinksAll), Some("Backlinks"));
    }

    #[test]
    fn alias_order_decides_between_substring_candidates() {
        let mapping = ColumnMapping::resolve(&headers(&["site url", "main domain"]));
        assert_eq!(mapping.column_name(CanonicalField::Target), Some("main domain"));
    }

    #[test]
    fn exactly_claimed_columns_are_not_reused_by_substring() {
        let mapping = ColumnMapping::resolve(&headers(&["Domain Rating", "URL Rating", "Creation Date"]));

        assert_eq!(mapping.column_index(CanonicalField::Target), None);
        assert_eq!(mapping.column_name(CanonicalField::Dr), Some("Domain Rating"));
        assert_eq!(mapping.column_name(CanonicalField::UrlRating), Some("URL Rating"));
        assert_eq!(mapping.column_name(CanonicalField::DomainAge), Some("Creation Date"));
    }

    #[test]
    fn unresolved_lists_missing_fields_in_schema_order() {
        let mapping = ColumnMapping::resolve(&headers(&["Target", "DR"]));
        let missing = mapping.unresolved();
        assert_eq!(missing.first(), Some(&CanonicalField::OrganicTraffic));
        assert!(!missing.contains(&CanonicalField::Dr));
        assert_eq!(missing.len(), CanonicalField::ALL.len() - 2);
    }
}
