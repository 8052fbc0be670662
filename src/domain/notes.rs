use regex::Regex;

/// Draft release notes for one tag.
///
/// The body is a skeleton: commit subjects are listed under placeholder
/// section headers for a maintainer to sort before publishing the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub tag: String,
    pub body: String,
}

impl ReleaseNotes {
    pub fn synthesize(tag: &str, subjects: &[String]) -> Self {
        let commit_titles = subjects
            .iter()
            .map(|subject| format!("- {}", subject))
            .collect::<Vec<_>>()
            .join("\n");

        let body = format!(
            "{tag}\n\
             \n\
             <!-- Please group the below commits into the appropriate sections -->\n\
             <!-- Please remove the default sections if they are not applicable -->\n\
             \n\
             ### New features\n\
             \n\
             ### Fixes\n\
             \n\
             ### Changed\n\
             \n\
             {commit_titles}\n"
        );

        ReleaseNotes {
            tag: tag.to_string(),
            body,
        }
    }
}

/// "New release" page for a hosted remote, e.g.
/// `git@github.com:acme/widgets.git` -> `https://github.com/acme/widgets/releases/new`.
pub fn release_page_url(remote_url: &str) -> Option<String> {
    let re = Regex::new(r"^(?:https?://|ssh://)?(?:[^@/]+@)?([^/:]+)[:/](.+?)(?:\.git)?/?$").ok()?;
    let captures = re.captures(remote_url.trim())?;
    Some(format!(
        "https://{}/{}/releases/new",
        &captures[1], &captures[2]
    ))
}
