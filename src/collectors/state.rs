use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;

/// Characters that encodeURIComponent does NOT encode.
/// A-Z a-z 0-9 - _ . ! ~ * ' ( )
pub const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A `{"label": .., "value": ..}` dropdown selection in the search UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub label: String,
    pub value: Option<Value>,
}

impl Selection {
    fn any() -> Self {
        Self {
            label: "Any".to_string(),
            value: None,
        }
    }
}

/// The full search state the HiringCafe API validates on every request.
///
/// Field order is the wire order. Every field is always serialized, null and
/// empty values included, because the API rejects payloads with missing keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub locations: Vec<Value>,
    pub workplace_types: Vec<String>,
    pub default_to_user_location: bool,
    pub commitment_types: Vec<String>,
    pub job_title_query: String,
    pub job_description_query: String,
    pub date_fetched_past_n_days: u32,

    // Compensation filters
    pub currency: Selection,
    pub frequency: Selection,
    pub min_compensation_low_end: Option<i64>,
    pub min_compensation_high_end: Option<i64>,
    pub max_compensation_low_end: Option<i64>,
    pub max_compensation_high_end: Option<i64>,
    pub restrict_jobs_to_transparent_salaries: bool,
    pub calc_frequency: String,

    // Experience ranges
    pub role_yoe_range: [u32; 2],
    pub exclude_if_role_yoe_is_not_specified: bool,
    pub management_yoe_range: [u32; 2],
    pub exclude_if_management_yoe_is_not_specified: bool,

    // Degree fields
    pub associates_degree_fields_of_study: Vec<String>,
    pub excluded_associates_degree_fields_of_study: Vec<String>,
    pub bachelors_degree_fields_of_study: Vec<String>,
    pub excluded_bachelors_degree_fields_of_study: Vec<String>,
    pub masters_degree_fields_of_study: Vec<String>,
    pub excluded_masters_degree_fields_of_study: Vec<String>,
    pub doctorate_degree_fields_of_study: Vec<String>,
    pub excluded_doctorate_degree_fields_of_study: Vec<String>,

    // Degree requirements
    pub associates_degree_requirements: Vec<String>,
    pub bachelors_degree_requirements: Vec<String>,
    pub masters_degree_requirements: Vec<String>,
    pub doctorate_degree_requirements: Vec<String>,

    // Licenses
    pub licenses_and_certifications: Vec<String>,
    pub excluded_licenses_and_certifications: Vec<String>,
    pub exclude_all_licenses_and_certifications: bool,

    // Categories
    pub departments: Vec<String>,
    pub excluded_departments: Vec<String>,
    pub industries: Vec<String>,
    pub excluded_industries: Vec<String>,
    pub company_keywords: Vec<String>,
    pub excluded_company_keywords: Vec<String>,
    pub hide_job_types: Vec<String>,
    pub application_form_ease: Vec<String>,

    // Language
    pub language_requirements: Vec<String>,
    pub excluded_language_requirements: Vec<String>,
    pub language_requirements_operator: String,
    pub exclude_jobs_with_additional_language_requirements: bool,

    pub benefits_and_perks: Vec<String>,
}

impl Default for SearchState {
    /// Defaults of the HiringCafe web client's search form.
    fn default() -> Self {
        let strings =
            |values: &[&str]| -> Vec<String> { values.iter().map(|v| v.to_string()).collect() };

        Self {
            locations: Vec::new(),
            workplace_types: strings(&["Remote", "Hybrid", "Onsite"]),
            default_to_user_location: true,
            commitment_types: strings(&[
                "Full-time",
                "Part-time",
                "Contract",
                "Internship",
                "Temporary",
                "Volunteer",
            ]),
            job_title_query: String::new(),
            job_description_query: String::new(),
            date_fetched_past_n_days: 121,
            currency: Selection::any(),
            frequency: Selection::any(),
            min_compensation_low_end: None,
            min_compensation_high_end: None,
            max_compensation_low_end: None,
            max_compensation_high_end: None,
            restrict_jobs_to_transparent_salaries: false,
            calc_frequency: "Yearly".to_string(),
            role_yoe_range: [0, 20],
            exclude_if_role_yoe_is_not_specified: false,
            management_yoe_range: [0, 20],
            exclude_if_management_yoe_is_not_specified: false,
            associates_degree_fields_of_study: Vec::new(),
            excluded_associates_degree_fields_of_study: Vec::new(),
            bachelors_degree_fields_of_study: Vec::new(),
            excluded_bachelors_degree_fields_of_study: Vec::new(),
            masters_degree_fields_of_study: Vec::new(),
            excluded_masters_degree_fields_of_study: Vec::new(),
            doctorate_degree_fields_of_study: Vec::new(),
            excluded_doctorate_degree_fields_of_study: Vec::new(),
            associates_degree_requirements: Vec::new(),
            bachelors_degree_requirements: Vec::new(),
            masters_degree_requirements: Vec::new(),
            doctorate_degree_requirements: Vec::new(),
            licenses_and_certifications: Vec::new(),
            excluded_licenses_and_certifications: Vec::new(),
            exclude_all_licenses_and_certifications: false,
            departments: Vec::new(),
            excluded_departments: Vec::new(),
            industries: Vec::new(),
            excluded_industries: Vec::new(),
            company_keywords: Vec::new(),
            excluded_company_keywords: Vec::new(),
            hide_job_types: Vec::new(),
            application_form_ease: Vec::new(),
            language_requirements: Vec::new(),
            excluded_language_requirements: Vec::new(),
            language_requirements_operator: "OR".to_string(),
            exclude_jobs_with_additional_language_requirements: false,
            benefits_and_perks: Vec::new(),
        }
    }
}

/// Optional replacements for the search dimensions exposed on the command line.
/// `None` keeps the default.
#[derive(Debug, Clone, Default)]
pub struct SearchOverrides {
    pub job_title_query: Option<String>,
    pub job_description_query: Option<String>,
    pub locations: Option<Vec<Value>>,
    pub workplace_types: Option<Vec<String>>,
    pub commitment_types: Option<Vec<String>>,
    pub date_fetched_past_n_days: Option<u32>,
    pub departments: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
}

impl SearchOverrides {
    pub fn with_query(query: Option<&str>) -> Self {
        Self {
            job_title_query: query.map(String::from),
            ..Self::default()
        }
    }

    /// Apply every override that is set on top of `state`.
    /// Empty query strings are ignored.
    pub fn apply(self, mut state: SearchState) -> SearchState {
        if let Some(query) = self.job_title_query.filter(|q| !q.is_empty()) {
            state.job_title_query = query;
        }
        if let Some(query) = self.job_description_query.filter(|q| !q.is_empty()) {
            state.job_description_query = query;
        }
        if let Some(locations) = self.locations {
            state.locations = locations;
        }
        if let Some(types) = self.workplace_types {
            state.workplace_types = types;
        }
        if let Some(types) = self.commitment_types {
            state.commitment_types = types;
        }
        if let Some(days) = self.date_fetched_past_n_days {
            state.date_fetched_past_n_days = days;
        }
        if let Some(departments) = self.departments {
            state.departments = departments;
        }
        if let Some(industries) = self.industries {
            state.industries = industries;
        }
        state
    }
}

/// Default search state with the job title query applied when non-empty.
pub fn build_state(query: Option<&str>) -> SearchState {
    SearchOverrides::with_query(query).apply(SearchState::default())
}

/// Encode state as the HiringCafe API expects:
/// JSON.stringify -> encodeURIComponent -> btoa
pub fn encode_state(state: &SearchState) -> String {
    // A struct of strings, numbers, bools and JSON values always serializes.
    let json_str = serde_json::to_string(state).unwrap_or_default();
    BASE64.encode(uri_component(&json_str).as_bytes())
}

/// Percent-encode a string the way JavaScript's encodeURIComponent does.
pub fn uri_component(s: &str) -> String {
    utf8_percent_encode(s, ENCODE_URI_COMPONENT_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;

    const DEFAULT_KEYS: [&str; 47] = [
        "locations",
        "workplaceTypes",
        "defaultToUserLocation",
        "commitmentTypes",
        "jobTitleQuery",
        "jobDescriptionQuery",
        "dateFetchedPastNDays",
        "currency",
        "frequency",
        "minCompensationLowEnd",
        "minCompensationHighEnd",
        "maxCompensationLowEnd",
        "maxCompensationHighEnd",
        "restrictJobsToTransparentSalaries",
        "calcFrequency",
        "roleYoeRange",
        "excludeIfRoleYoeIsNotSpecified",
        "managementYoeRange",
        "excludeIfManagementYoeIsNotSpecified",
        "associatesDegreeFieldsOfStudy",
        "excludedAssociatesDegreeFieldsOfStudy",
        "bachelorsDegreeFieldsOfStudy",
        "excludedBachelorsDegreeFieldsOfStudy",
        "mastersDegreeFieldsOfStudy",
        "excludedMastersDegreeFieldsOfStudy",
        "doctorateDegreeFieldsOfStudy",
        "excludedDoctorateDegreeFieldsOfStudy",
        "associatesDegreeRequirements",
        "bachelorsDegreeRequirements",
        "mastersDegreeRequirements",
        "doctorateDegreeRequirements",
        "licensesAndCertifications",
        "excludedLicensesAndCertifications",
        "excludeAllLicensesAndCertifications",
        "departments",
        "excludedDepartments",
        "industries",
        "excludedIndustries",
        "companyKeywords",
        "excludedCompanyKeywords",
        "hideJobTypes",
        "applicationFormEase",
        "languageRequirements",
        "excludedLanguageRequirements",
        "languageRequirementsOperator",
        "excludeJobsWithAdditionalLanguageRequirements",
        "benefitsAndPerks",
    ];

    fn decode_token(token: &str) -> String {
        let bytes = BASE64.decode(token).unwrap();
        let uri = String::from_utf8(bytes).unwrap();
        percent_decode_str(&uri).decode_utf8().unwrap().into_owned()
    }

    #[test]
    fn default_state_serializes_every_key() {
        let value = serde_json::to_value(build_state(None)).unwrap();
        // serde_json::Map is sorted without preserve_order
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();

        let mut expected = DEFAULT_KEYS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn key_order_follows_the_web_client() {
        let json = serde_json::to_string(&build_state(None)).unwrap();
        let positions: Vec<usize> = DEFAULT_KEYS
            .iter()
            .map(|k| json.find(&format!("\"{k}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn compact_json_keeps_declaration_order_and_nulls() {
        let json = serde_json::to_string(&build_state(None)).unwrap();
        assert!(json.starts_with(r#"{"locations":[],"workplaceTypes":["Remote","#));
        assert!(json.contains(r#""workplaceTypes":["Remote","Hybrid","Onsite"],"#));
        assert!(json.contains(r#""defaultToUserLocation":true,"commitmentTypes":["Full-time","#));
        assert!(json.contains(r#""jobTitleQuery":"","jobDescriptionQuery":"","#));
        assert!(json.contains(r#""dateFetchedPastNDays":121,"currency":"#));
        assert!(json.contains(r#""currency":{"label":"Any","value":null}"#));
        assert!(json.contains(r#""minCompensationLowEnd":null"#));
        assert!(json.contains(r#""roleYoeRange":[0,20]"#));
        assert!(json.ends_with(r#""benefitsAndPerks":[]}"#));
        assert!(!json.contains(' '));
    }

    #[test]
    fn query_is_applied_only_when_non_empty() {
        assert_eq!(build_state(Some("platform engineer")).job_title_query, "platform engineer");
        assert_eq!(build_state(Some("")).job_title_query, "");
        assert_eq!(build_state(None), SearchState::default());
    }

    #[test]
    fn overrides_replace_only_the_fields_set() {
        let state = SearchOverrides {
            workplace_types: Some(vec!["Remote".to_string()]),
            date_fetched_past_n_days: Some(7),
            industries: Some(vec!["Software".to_string()]),
            ..SearchOverrides::default()
        }
        .apply(SearchState::default());

        assert_eq!(state.workplace_types, vec!["Remote".to_string()]);
        assert_eq!(state.date_fetched_past_n_days, 7);
        assert_eq!(state.industries, vec!["Software".to_string()]);
        assert_eq!(state.commitment_types, SearchState::default().commitment_types);
        assert_eq!(state.job_title_query, "");
    }

    #[test]
    fn encoding_is_deterministic() {
        let state = build_state(Some("platform engineer"));
        assert_eq!(encode_state(&state), encode_state(&state));
        assert_eq!(encode_state(&state), encode_state(&build_state(Some("platform engineer"))));
        assert_ne!(encode_state(&state), encode_state(&build_state(None)));
    }

    #[test]
    fn token_decodes_back_to_compact_json() {
        let state = build_state(Some("rust & go"));
        let decoded = decode_token(&encode_state(&state));
        assert_eq!(decoded, serde_json::to_string(&state).unwrap());
    }

    #[test]
    fn uri_component_matches_encode_uri_component() {
        let cases = [
            (r#"{"a":1}"#, "%7B%22a%22%3A1%7D"),
            ("[1,2]", "%5B1%2C2%5D"),
            ("platform engineer", "platform%20engineer"),
            ("-_.!~*'()", "-_.!~*'()"),
            ("AZaz09", "AZaz09"),
            ("a+b/c=d", "a%2Bb%2Fc%3Dd"),
            ("?&#$@;", "%3F%26%23%24%40%3B"),
            ("`^|\\<>%", "%60%5E%7C%5C%3C%3E%25"),
            ("café", "caf%C3%A9"),
        ];
        for (input, expected) in cases {
            assert_eq!(uri_component(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn only_the_unreserved_ascii_set_stays_literal() {
        for byte in 0u8..128 {
            let ch = byte as char;
            let encoded = uri_component(&ch.to_string());
            let literal = ch.is_ascii_alphanumeric() || "-_.!~*'()".contains(ch);
            if literal {
                assert_eq!(encoded, ch.to_string());
            } else {
                assert_eq!(encoded, format!("%{byte:02X}"));
            }
        }
    }

    #[test]
    fn encoded_payload_has_no_json_structural_characters() {
        let token = encode_state(&build_state(Some("sre")));
        let uri = String::from_utf8(BASE64.decode(&token).unwrap()).unwrap();
        for ch in ['{', '}', '[', ']', '"', ':', ',', ' '] {
            assert!(!uri.contains(ch), "found literal {ch:?}");
        }
        assert!(uri.starts_with("%7B%22locations%22%3A%5B%5D%2C"));
    }
}
