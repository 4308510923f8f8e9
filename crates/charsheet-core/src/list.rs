use anyhow::Result;

use crate::traits::ProfileStore;

/// Summary row for a single saved profile.
pub struct ProfileRow {
    pub file: String,
    pub name: String,
    pub role: String,
    pub language: String,
}

/// Summarize every profile in `store`, newest-first. Unreadable files are
/// reported on stderr and skipped.
pub fn scan(store: &dyn ProfileStore) -> Result<Vec<ProfileRow>> {
    let mut rows = Vec::new();
    for file in store.list()? {
        match store.read(&file) {
            Ok(profile) => rows.push(ProfileRow {
                name: profile.display_name().to_string(),
                role: non_empty(&profile.identity.role_or_occupation),
                language: profile.meta.language.to_string(),
                file,
            }),
            Err(e) => {
                eprintln!("  skip {file}: {e}");
            }
        }
    }
    Ok(rows)
}

fn non_empty(s: &str) -> String {
    if s.trim().is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Print rows as an aligned table to stdout.
pub fn print_table(rows: &[ProfileRow]) {
    if rows.is_empty() {
        println!("(no profiles found)");
        return;
    }
    let width = |f: fn(&ProfileRow) -> &str| {
        rows.iter()
            .map(|r| f(r).chars().count())
            .max()
            .unwrap_or(4)
            .max(4)
    };
    let w_file = width(|r| r.file.as_str());
    let w_name = width(|r| r.name.as_str());
    let w_role = width(|r| r.role.as_str());

    println!(
        "{}  {}  {}  LANG",
        pad("FILE", w_file),
        pad("NAME", w_name),
        pad("ROLE", w_role)
    );
    println!(
        "{}  {}  {}  ----",
        "-".repeat(w_file),
        "-".repeat(w_name),
        "-".repeat(w_role)
    );
    for r in rows {
        println!(
            "{}  {}  {}  {}",
            pad(&r.file, w_file),
            pad(&r.name, w_name),
            pad(&r.role, w_role),
            r.language
        );
    }
}

// `{:<w$}` pads by char count, which is what we want for CJK names too.
fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DirProfileStore;
    use crate::templates::sample_profile_at;

    #[test]
    fn scan_skips_unreadable_files() {
        let tmp = tempfile::tempdir().unwrap();
        let good = sample_profile_at("ナルト", "n1", "2025-01-02T03:04:05+09:00");
        std::fs::write(tmp.path().join("b_naruto.json"), good.to_string()).unwrap();
        std::fs::write(tmp.path().join("a_broken.json"), "{").unwrap();

        let rows = scan(&DirProfileStore::new(tmp.path())).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file, "b_naruto.json");
        assert_eq!(rows[0].name, "ナルト");
        assert_eq!(rows[0].role, "冒険者");
        assert_eq!(rows[0].language, "ja");
    }
}
