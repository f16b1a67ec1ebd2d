//! Destination file naming.
//!
//! Downloaded audio lands at `<destination>/<channel>/<artist>-<title>.mp3`
//! with both metadata fields reduced to lowercase hyphenated slugs, so
//! "Fleetwood Mac" / "Dreams" on "thebridge" becomes
//! `thebridge/fleetwood-mac-dreams.mp3`. The slug form doubles as the
//! idempotence key: a re-run recomputes the same path and finds the file.

use std::path::{Path, PathBuf};

use crate::model::TrackDescriptor;

/// Reduce a metadata field to a filesystem-safe slug.
///
/// Lowercases, keeps alphanumerics, and collapses every run of anything
/// else into a single hyphen. Never produces path separators or
/// Windows-invalid characters.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// File name for a track: `<artist-slug>-<title-slug>.mp3`.
///
/// Falls back to "unknown" for a field that slugs down to nothing, so the
/// name never starts or ends with a bare hyphen.
pub fn track_file_name(track: &TrackDescriptor) -> String {
    let artist = non_empty_slug(&track.artist);
    let title = non_empty_slug(&track.title);
    format!("{}-{}.mp3", artist, title)
}

/// Full destination path for a track under the destination root.
pub fn track_path(destination: &Path, track: &TrackDescriptor) -> PathBuf {
    destination
        .join(slugify(track.channel.slug()))
        .join(track_file_name(track))
}

fn non_empty_slug(field: &str) -> String {
    let slug = slugify(field);
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChannelRequest;

    fn track(artist: &str, title: &str) -> TrackDescriptor {
        TrackDescriptor {
            title: title.to_string(),
            artist: artist.to_string(),
            album: None,
            channel: ChannelRequest::new("thebridge"),
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Fleetwood Mac"), "fleetwood-mac");
        assert_eq!(slugify("Dreams"), "dreams");
        assert_eq!(slugify("AC/DC"), "ac-dc");
    }

    #[test]
    fn test_slugify_strips_punctuation_runs() {
        assert_eq!(slugify("Don't Stop Believin'"), "don-t-stop-believin");
        assert_eq!(slugify("  What?!  "), "what");
        assert_eq!(slugify("99 Luftballons"), "99-luftballons");
    }

    #[test]
    fn test_track_file_name_matches_expected_layout() {
        assert_eq!(
            track_file_name(&track("Fleetwood Mac", "Dreams")),
            "fleetwood-mac-dreams.mp3"
        );
    }

    #[test]
    fn test_track_path_is_per_channel() {
        let path = track_path(Path::new("/music"), &track("Fleetwood Mac", "Dreams"));
        assert_eq!(
            path,
            PathBuf::from("/music/thebridge/fleetwood-mac-dreams.mp3")
        );
    }

    #[test]
    fn test_empty_fields_fall_back_to_unknown() {
        assert_eq!(track_file_name(&track("", "???")), "unknown-unknown.mp3");
    }
}
