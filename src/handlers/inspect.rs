use crate::inspector::{inspect_profile, render_report};

/// Inspect each profile in turn and print its report.
///
/// Failures are part of the report, so this never fails.
pub async fn handle_inspect(profiles: &[String], default_region: &str) -> crate::Result<()> {
    for profile in profiles {
        let result = inspect_profile(profile, default_region).await;
        if let Err(e) = &result {
            log::warn!("Profile {}: {}", profile, e);
        }
        print!("{}", render_report(profile, &result));
    }
    Ok(())
}
