// defs.rs
// Shared definitions for TShock REST lookups and filters

/// Lookup key used by the `/v2/users/*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookupType {
    Id,
    Name,
}

impl UserLookupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLookupType::Id => "id",
            UserLookupType::Name => "name",
        }
    }
}

/// Lookup key used by the `/v2/bans/*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanLookupType {
    Name,
    Ip,
}

impl BanLookupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BanLookupType::Name => "name",
            BanLookupType::Ip => "ip",
        }
    }
}

/// Optional player filters accepted by `/v2/server/status`.
///
/// Unset fields are omitted from the query string entirely, matching
/// how the endpoint treats missing filters.
#[derive(Debug, Clone, Default)]
pub struct StatusFilters {
    pub nickname: Option<String>,
    pub username: Option<String>,
    pub group: Option<String>,
    pub active: Option<String>,
    pub state: Option<String>,
    pub team: Option<String>,
}

impl StatusFilters {
    pub(crate) fn push_params(&self, params: &mut Vec<(&'static str, String)>) {
        let fields = [
            ("nickname", &self.nickname),
            ("username", &self.username),
            ("group", &self.group),
            ("active", &self.active),
            ("state", &self.state),
            ("team", &self.team),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                params.push((key, value.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_wire_values() {
        assert_eq!(UserLookupType::Id.as_str(), "id");
        assert_eq!(UserLookupType::Name.as_str(), "name");
        assert_eq!(BanLookupType::Name.as_str(), "name");
        assert_eq!(BanLookupType::Ip.as_str(), "ip");
    }

    #[test]
    fn test_status_filters_skip_unset_fields() {
        let filters = StatusFilters {
            nickname: Some("Alice".to_string()),
            team: Some("1".to_string()),
            ..StatusFilters::default()
        };

        let mut params = Vec::new();
        filters.push_params(&mut params);
        assert_eq!(
            params,
            vec![
                ("nickname", "Alice".to_string()),
                ("team", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_filters_default_is_empty() {
        let mut params = Vec::new();
        StatusFilters::default().push_params(&mut params);
        assert!(params.is_empty());
    }
}
