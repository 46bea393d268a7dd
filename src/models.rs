use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// One answer of a questionnaire response as returned by the form service.
///
/// Decorative form elements carry no `questionKey`; the normalizer ignores them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "questionKey", default, skip_serializing_if = "Option::is_none")]
    pub question_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answer: String,
}

impl RawAnswer {
    pub fn new(question_key: &str, answer: &str) -> Self {
        Self {
            label: None,
            question_key: Some(question_key.to_string()),
            answer: answer.to_string(),
        }
    }

    /// An answer without a semantic key
    pub fn unkeyed(label: &str, answer: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            question_key: None,
            answer: answer.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed subscription provisioning request built from a form response.
///
/// Every field absent from the form keeps its zero value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOrder {
    pub budget_amount: i64,
    pub budget_contact: Vec<String>,
    #[serde(rename = "entraIDName")]
    pub entra_id_name: String,
    pub kostnadsoppfolger: String,
    pub l2_approver: String,
    pub management_tree: String,
    pub environment: String,
    pub subscription_name: String,
    pub vnet_size: i32,
    pub business_bestiller_referanse: String,
    pub business_org: String,
    pub create_new_pim: bool,
    #[serde(rename = "entraIDGroup")]
    pub entra_id_group: String,
    pub finansiering: String,
    pub finansiering_ved_prosjektslutt: String,
    pub forretningsprodukt: String,
    pub management_group: String,
    pub security_contact: Vec<String>,
}

impl SubscriptionOrder {
    /// Contact lists that must resolve in the directory, in validation order
    pub fn contact_lists(&self) -> [(&'static str, &[String]); 2] {
        [
            ("budgetContact", self.budget_contact.as_slice()),
            ("securityContact", self.security_contact.as_slice()),
        ]
    }
}

/// A directory identity reduced to what email validation needs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DirectoryEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl DirectoryEntry {
    pub fn new(id: &str, email: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            emails: vec![email.to_string()],
        }
    }

    /// Case-insensitive match against any of the entry's addresses
    pub fn has_email(&self, email: &str) -> bool {
        let wanted = email.to_lowercase();
        self.emails.iter().any(|e| e.to_lowercase() == wanted)
    }
}

/// Where the next page of a directory query starts.
#[derive(Debug, Clone, PartialEq)]
pub enum PageCursor {
    /// Absolute URL of the next page request
    NextLink(Url),
    /// 1-based index of the first entry of the next page
    StartIndex(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryPage {
    pub entries: Vec<DirectoryEntry>,
    pub next: Option<PageCursor>,
}

/// SCIM 2.0 ListResponse (RFC 7644 section 3.4.2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimListResponse {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
    #[serde(rename = "startIndex", skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,
    #[serde(rename = "itemsPerPage", skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<i64>,
    #[serde(rename = "Resources", default)]
    pub resources: Vec<serde_json::Value>,
}

/// Microsoft Graph collection response for `/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphUserCollection {
    #[serde(default)]
    pub value: Vec<GraphUser>,
    #[serde(rename = "@odata.nextLink", default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

impl From<GraphUser> for DirectoryEntry {
    fn from(user: GraphUser) -> Self {
        Self {
            id: user.id,
            emails: user.mail.into_iter().collect(),
        }
    }
}
