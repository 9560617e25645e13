//! Granting access to items.
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Role granted by a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read access.
    Read,
    /// Write access.
    Write,
}

/// Request body of the `invite` action.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    /// Who to invite.
    pub recipients: Vec<DriveRecipient>,
    /// Message included in the invitation.
    pub message: Option<String>,
    /// Must the recipient sign in to access the item?
    pub require_sign_in: bool,
    /// Should an email be sent?
    pub send_invitation: bool,
    /// Roles granted.
    pub roles: Vec<Role>,
}

impl InviteRequest {
    /// Silently grant a signed-in principal read and write access.
    #[must_use]
    pub fn read_write(email: impl Into<String>) -> Self {
        Self {
            recipients: vec![DriveRecipient {
                email: Some(email.into()),
                object_id: None,
            }],
            message: None,
            require_sign_in: true,
            send_invitation: false,
            roles: vec![Role::Read, Role::Write],
        }
    }
}

/// Someone to invite.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveRecipient {
    /// Email address.
    pub email: Option<String>,
    /// Azure AD object id.
    pub object_id: Option<String>,
}

/// A permission on an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Permission id.
    pub id: String,
    /// Granted roles, e.g. `["write"]`.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Who the permission was granted to.
    pub granted_to: Option<IdentitySet>,
    /// Details of the invitation, if the permission came from one.
    pub invitation: Option<SharingInvitation>,
}

/// Identities of a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySet {
    /// The user.
    pub user: Option<Identity>,
}

/// An identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Object id.
    pub id: Option<String>,
    /// Name shown to humans.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Invitation details of a permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingInvitation {
    /// Address the invitation was sent to.
    pub email: Option<String>,
    /// Must the recipient sign in?
    #[serde(default)]
    pub sign_in_required: bool,
}

#[cfg(test)]
mod tests {
    use super::{InviteRequest, Permission};

    #[test]
    fn read_write_invite() {
        let json = serde_json::to_value(InviteRequest::read_write("ann@contoso.com")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "recipients": [{ "email": "ann@contoso.com" }],
                "requireSignIn": true,
                "sendInvitation": false,
                "roles": ["read", "write"]
            })
        );
    }

    #[test]
    fn deserialize_permission() {
        let p: Permission = serde_json::from_str(
            r#"{
                "id": "aTowIy5m",
                "roles": ["write"],
                "grantedTo": { "user": { "email": "ann@contoso.com", "id": "42", "displayName": "Ann" } },
                "invitation": { "email": "ann@contoso.com", "signInRequired": true }
            }"#,
        )
        .unwrap();

        assert_eq!(p.roles, vec!["write"]);
        assert!(p.invitation.unwrap().sign_in_required);
        assert_eq!(
            p.granted_to.unwrap().user.unwrap().display_name.as_deref(),
            Some("Ann")
        );
    }
}
