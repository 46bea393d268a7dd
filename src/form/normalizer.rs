//! Form normalization
//!
//! Turns the flat answer array of a form response into a [`SubscriptionOrder`].
//! Answers are first collected into a semantic-key map, then every field is
//! coerced by its own rule so each rule can be tested in isolation.

use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{RawAnswer, SubscriptionOrder};

pub const BUDGET_AMOUNT: &str = "budgetAmount";
pub const BUDGET_CONTACT: &str = "budgetContact";
/// The form renamed `entraIDName` to `pimApproverNew`; the new key wins when both are sent.
pub const ENTRA_ID_NAME: &[&str] = &["pimApproverNew", "entraIDName"];
pub const KOSTNADSOPPFOLGER: &str = "kostnadsoppfolger";
pub const L2_APPROVER: &str = "l2Approver";
pub const MANAGEMENT_TREE: &str = "managementTree";
pub const ENVIRONMENT: &str = "environment";
pub const SUBSCRIPTION_NAME: &str = "subscriptionName";
pub const VNET_SIZE: &str = "vnetSize";
pub const BUSINESS_BESTILLER_REFERANSE: &str = "businessBestillerReferanse";
pub const BUSINESS_ORG: &str = "businessOrg";
pub const CREATE_NEW_PIM: &str = "createNewPim";
pub const ENTRA_ID_GROUP: &str = "entraIDGroup";
pub const FINANSIERING: &str = "finansiering";
pub const FINANSIERING_VED_PROSJEKTSLUTT: &str = "finansieringVedProsjektslutt";
pub const FORRETNINGSPRODUKT: &str = "forretningsprodukt";
pub const MANAGEMENT_GROUP: &str = "managementGroup";
pub const SECURITY_CONTACT: &str = "securityContact";

/// Semantic key to trimmed answer text
pub type AnswerMap = HashMap<String, String>;

/// Collect keyed answers; unkeyed answers are dropped and later duplicates win.
pub fn collect_answers(answers: &[RawAnswer]) -> AnswerMap {
    let mut map = AnswerMap::new();
    for answer in answers {
        let Some(key) = answer.question_key.as_deref() else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), answer.answer.trim().to_string());
    }
    map
}

/// Normalize a form response. Any field that fails to coerce fails the whole record.
pub fn normalize(answers: &[RawAnswer]) -> AppResult<SubscriptionOrder> {
    let map = collect_answers(answers);

    Ok(SubscriptionOrder {
        budget_amount: integer_field(&map, BUDGET_AMOUNT)?,
        budget_contact: list_field(&map, BUDGET_CONTACT),
        entra_id_name: text_field_aliased(&map, ENTRA_ID_NAME),
        kostnadsoppfolger: text_field(&map, KOSTNADSOPPFOLGER),
        l2_approver: text_field(&map, L2_APPROVER),
        management_tree: text_field(&map, MANAGEMENT_TREE),
        environment: text_field(&map, ENVIRONMENT),
        subscription_name: text_field(&map, SUBSCRIPTION_NAME),
        vnet_size: prefix_field(&map, VNET_SIZE)?,
        business_bestiller_referanse: text_field(&map, BUSINESS_BESTILLER_REFERANSE),
        business_org: text_field(&map, BUSINESS_ORG),
        create_new_pim: bool_field(&map, CREATE_NEW_PIM)?,
        entra_id_group: text_field(&map, ENTRA_ID_GROUP),
        finansiering: text_field(&map, FINANSIERING),
        finansiering_ved_prosjektslutt: text_field(&map, FINANSIERING_VED_PROSJEKTSLUTT),
        forretningsprodukt: text_field(&map, FORRETNINGSPRODUKT),
        management_group: text_field(&map, MANAGEMENT_GROUP),
        security_contact: list_field(&map, SECURITY_CONTACT),
    })
}

/// First alias present in priority order
fn lookup<'a>(map: &'a AnswerMap, keys: &[&'static str]) -> Option<(&'static str, &'a str)> {
    keys.iter()
        .find_map(|key| map.get(*key).map(|value| (*key, value.as_str())))
}

fn text_field(map: &AnswerMap, key: &'static str) -> String {
    text_field_aliased(map, &[key])
}

fn text_field_aliased(map: &AnswerMap, keys: &[&'static str]) -> String {
    lookup(map, keys)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

fn list_field(map: &AnswerMap, key: &'static str) -> Vec<String> {
    map.get(key).map(|value| split_list(value)).unwrap_or_default()
}

fn integer_field(map: &AnswerMap, key: &'static str) -> AppResult<i64> {
    match map.get(key) {
        Some(value) => value
            .parse::<i64>()
            .map_err(|e| AppError::parse(key, value, e)),
        None => Ok(0),
    }
}

fn prefix_field(map: &AnswerMap, key: &'static str) -> AppResult<i32> {
    match map.get(key) {
        Some(value) if !value.is_empty() => parse_prefix(value).map_err(|e| AppError::parse(key, value, e)),
        _ => Ok(0),
    }
}

fn bool_field(map: &AnswerMap, key: &'static str) -> AppResult<bool> {
    match map.get(key) {
        Some(value) if !value.is_empty() => {
            parse_bool(value).ok_or_else(|| AppError::parse(key, value, "not a boolean"))
        }
        _ => Ok(false),
    }
}

/// Split a comma separated answer.
///
/// All whitespace is removed and a single leading and trailing comma is
/// stripped. Interior runs like `a,,b` keep their empty element.
pub fn split_list(raw: &str) -> Vec<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.strip_suffix(',').unwrap_or(&compact);
    let compact = compact.strip_prefix(',').unwrap_or(compact);
    if compact.is_empty() {
        return Vec::new();
    }
    compact.split(',').map(str::to_string).collect()
}

/// Parse a CIDR prefix such as `/20` or `20`.
pub fn parse_prefix(raw: &str) -> Result<i32, std::num::ParseIntError> {
    raw.replace('/', "").parse::<i32>()
}

/// Boolean text forms accepted by the form service
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
