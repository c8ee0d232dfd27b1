//! Admin command: organizations, quotas, users.

use lavoir::admin::AdminClient;
use lavoir::error::Result;

use crate::cli::AdminAction;
use crate::commands::auth_from_env;
use crate::table;

pub fn run(action: AdminAction, base_url: String) -> Result<()> {
    let auth = auth_from_env(None);
    let client = AdminClient::new(base_url)?;

    match action {
        AdminAction::Orgs => {
            let orgs = client.organizations(&auth)?;
            let headers = vec![
                "ID".to_string(),
                "NAME".to_string(),
                "QUOTA".to_string(),
            ];
            let rows: Vec<Vec<String>> = orgs
                .iter()
                .map(|org| {
                    vec![
                        org.id.clone(),
                        org.name.clone(),
                        format!("{}/{}", org.quota_used, org.quota_limit),
                    ]
                })
                .collect();
            table::print_table(&headers, &rows);
        }

        AdminAction::Quota { organization } => {
            let quota = client.organization_quota(&organization, &auth)?;
            println!(
                "used {} of {} ({:.1}%), {} remaining",
                quota.quota_used, quota.quota_limit, quota.quota_percentage, quota.quota_remaining
            );
        }

        AdminAction::Users { organization } => {
            let users = client.users(&organization, &auth)?;
            let headers = vec![
                "ID".to_string(),
                "EMAIL".to_string(),
                "ADMIN".to_string(),
            ];
            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|user| {
                    vec![
                        user.id.clone(),
                        user.email.clone(),
                        if user.is_admin { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            table::print_table(&headers, &rows);
        }
    }
    Ok(())
}
