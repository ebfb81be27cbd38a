//! Request bodies sent to the Marketing API.
//!
//! Responses are not decoded: success is judged by status alone and error
//! bodies are passed to the domain as text.

use serde::Serialize;

use crate::domain::ports::{MemberTag, MemberUpsert, NEW_MEMBER_STATUS};

const ACTIVE_TAG_STATUS: &str = "active";

#[derive(Debug, Serialize)]
pub(super) struct UpsertMemberDto<'a> {
    pub(super) email_address: &'a str,
    pub(super) status_if_new: &'static str,
    pub(super) merge_fields: MergeFieldsDto<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub(super) struct MergeFieldsDto<'a> {
    pub(super) role: &'static str,
    pub(super) source: &'a str,
}

impl<'a> From<&'a MemberUpsert> for UpsertMemberDto<'a> {
    fn from(upsert: &'a MemberUpsert) -> Self {
        Self {
            email_address: &upsert.email_address,
            status_if_new: NEW_MEMBER_STATUS,
            merge_fields: MergeFieldsDto {
                role: upsert.role.as_str(),
                source: &upsert.source,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct MemberTagsDto<'a> {
    pub(super) tags: [TagDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct TagDto<'a> {
    pub(super) name: &'a str,
    pub(super) status: &'static str,
}

impl<'a> From<&'a MemberTag> for MemberTagsDto<'a> {
    fn from(tag: &'a MemberTag) -> Self {
        Self {
            tags: [TagDto {
                name: &tag.name,
                status: ACTIVE_TAG_STATUS,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use serde_json::json;

    #[test]
    fn upsert_body_uses_uppercase_merge_fields() {
        let upsert = MemberUpsert {
            email_address: "Ada@Example.com".to_owned(),
            role: Role::Teacher,
            source: "landing-v1".to_owned(),
        };
        let body = serde_json::to_value(UpsertMemberDto::from(&upsert)).expect("serialise");
        assert_eq!(
            body,
            json!({
                "email_address": "Ada@Example.com",
                "status_if_new": "pending",
                "merge_fields": { "ROLE": "teacher", "SOURCE": "landing-v1" }
            })
        );
    }

    #[test]
    fn tag_body_marks_a_single_tag_active() {
        let tag = MemberTag::for_role(Role::Student);
        let body = serde_json::to_value(MemberTagsDto::from(&tag)).expect("serialise");
        assert_eq!(
            body,
            json!({ "tags": [{ "name": "waitlist-student", "status": "active" }] })
        );
    }
}
