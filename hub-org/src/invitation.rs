//! Invitation email template.

use hub_email::Email;

/// Link the invited user follows to accept membership.
///
/// # Examples
///
/// ```
/// use hub_org::invitation::accept_link;
///
/// assert_eq!(
///     accept_link("https://hub.example.com/", "org1"),
///     "https://hub.example.com/accept-invitation?org=org1"
/// );
/// ```
pub fn accept_link(base_url: &str, organization_name: &str) -> String {
    format!(
        "{}/accept-invitation?org={}",
        base_url.trim_end_matches('/'),
        organization_name
    )
}

/// Build the invitation sent to a newly added member.
pub fn invitation_email(to: impl Into<String>, organization_name: &str, base_url: &str) -> Email {
    let link = accept_link(base_url, organization_name);
    let subject = format!("Invitation to join {organization_name} on the hub");
    let body = format!(
        "<p>You have been invited to join the <b>{organization_name}</b> organization.</p>\n\
         <p>To accept the invitation, please click on the link below:</p>\n\
         <p><a href=\"{link}\">{link}</a></p>\n\
         <p>If you were not expecting this invitation, you can ignore this email.</p>"
    );
    Email::new(to, subject, body)
}
