use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

fn base_join(base: &str, path: &str) -> String {
    let b = base.trim_end_matches('/');
    let p = path.trim_start_matches('/');
    format!("{}/{}", b, p)
}

fn enc(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

pub fn home(base: &str) -> String {
    base_join(base, "")
}
pub fn signup(base: &str) -> String {
    base_join(base, "signup")
}
pub fn login(base: &str) -> String {
    base_join(base, "login")
}
pub fn add_child(base: &str) -> String {
    base_join(base, "add-child")
}
pub fn save_activity(base: &str) -> String {
    base_join(base, "save-activity")
}
pub fn view_report(base: &str, child_name: &str) -> String {
    base_join(base, &format!("view-report/{}", enc(child_name)))
}
pub fn children(base: &str, parent_email: &str) -> String {
    base_join(base, &format!("children/{}", enc(parent_email)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slashes() {
        assert_eq!(signup("http://x:1/"), "http://x:1/signup");
        assert_eq!(signup("http://x:1"), "http://x:1/signup");
    }

    #[test]
    fn encodes_path_segments() {
        assert_eq!(
            children("http://x", "a.b+1@gmail.com"),
            "http://x/children/a%2Eb%2B1%40gmail%2Ecom"
        );
        assert_eq!(
            view_report("http://x", "Amal Perera"),
            "http://x/view-report/Amal%20Perera"
        );
    }
}
