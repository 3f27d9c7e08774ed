pub const ANALYSIS_SYSTEM: &str = include_str!("../data/prompts/analysis_system.txt");
pub const ANALYSIS_USER: &str = include_str!("../data/prompts/analysis_user.txt");
pub const OUTREACH_SYSTEM: &str = include_str!("../data/prompts/outreach_system.txt");
pub const OUTREACH_USER: &str = include_str!("../data/prompts/outreach_user.txt");
pub const INTERVIEW_SYSTEM: &str = include_str!("../data/prompts/interview_system.txt");
pub const INTERVIEW_BOOTSTRAP: &str = include_str!("../data/prompts/interview_bootstrap.txt");
pub const GLOBAL_CHAT_SYSTEM: &str = include_str!("../data/prompts/global_chat_system.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
