//! Commit object
//!
//! Commits record a snapshot: the tree id, at most one parent commit, the
//! author and committer lines and a free-text message.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>          (omitted for the first commit)
//! author <identity> <timestamp> <offset>
//! committer <identity> <timestamp> <offset>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::config::CommitConfig;
use crate::errors::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::{BufRead, Read};

/// Author or committer: `Name <email>` plus a timestamp in a fixed offset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    identity: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    pub fn new(identity: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            identity,
            timestamp,
        }
    }

    /// Build the signature for a new commit.
    ///
    /// Identity and offset come from the configuration. `GIT_AUTHOR_NAME` and
    /// `GIT_AUTHOR_EMAIL` override the identity, `GIT_AUTHOR_DATE` pins the
    /// timestamp (`%Y-%m-%d %H:%M:%S %z` or RFC 2822).
    pub fn load(config: &CommitConfig) -> Result<Self> {
        let identity = match (
            std::env::var("GIT_AUTHOR_NAME"),
            std::env::var("GIT_AUTHOR_EMAIL"),
        ) {
            (Ok(name), Ok(email)) => format!("{name} <{email}>"),
            _ => config.identity.clone(),
        };

        let timestamp = match std::env::var("GIT_AUTHOR_DATE") {
            Ok(date) => DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z")
                .or_else(|_| DateTime::parse_from_rfc2822(&date))
                .map_err(|_| Error::Config(format!("invalid GIT_AUTHOR_DATE {date:?}")))?,
            Err(_) => chrono::Utc::now().with_timezone(&config.utc_offset()?),
        };

        Ok(Author::new(identity, timestamp))
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// `identity unix-seconds ±HHMM`
    pub fn display(&self) -> String {
        format!(
            "{} {} {}",
            self.identity,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

/// Parse a `±HHMM` offset.
pub fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let (sign, digits) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let malformed = || {
            Error::MalformedPayload(ObjectType::Commit, format!("invalid signature {value:?}"))
        };

        // Format: "identity timestamp offset", split from the right
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(malformed());
        }

        let offset = parse_offset(parts[0]).ok_or_else(malformed)?;
        let seconds = parts[1].parse::<i64>().map_err(|_| malformed())?;
        let timestamp = offset
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(malformed)?;

        Ok(Author::new(parts[2].to_string(), timestamp))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Absent for the first commit
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// First line of the message.
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.display()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedPayload(ObjectType::Commit, reason.into());

        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| malformed("commit is not UTF-8"))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| malformed("missing blank line before message"))?;
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| malformed("missing tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines.next().ok_or_else(|| malformed("missing author line"))?;
        let parent = match next_line.strip_prefix("parent ") {
            Some(parent) => {
                next_line = lines.next().ok_or_else(|| malformed("missing author line"))?;
                Some(ObjectId::try_parse(parent.to_string())?)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| malformed("invalid author line"))?;
        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| malformed("missing committer line"))?;

        Ok(Self::new(
            parent,
            tree_oid,
            Author::try_from(author)?,
            Author::try_from(committer)?,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> Author {
        let offset = parse_offset("+0900").unwrap();
        Author::new(
            "to-hutohu <tohu.soy@gmail.com>".to_string(),
            offset.timestamp_opt(1_600_000_000, 0).unwrap(),
        )
    }

    #[fixture]
    fn tree_oid() -> ObjectId {
        ObjectId::try_parse("4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string()).unwrap()
    }

    #[rstest]
    fn root_commit_has_no_parent_line(author: Author, tree_oid: ObjectId) {
        let commit = Commit::new(None, tree_oid, author.clone(), author, "first".to_string());

        assert_eq!(
            commit.display(),
            "tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
             author to-hutohu <tohu.soy@gmail.com> 1600000000 +0900\n\
             committer to-hutohu <tohu.soy@gmail.com> 1600000000 +0900\n\
             \n\
             first"
        );
    }

    #[rstest]
    fn parses_its_own_payload(author: Author, tree_oid: ObjectId) {
        let parent = Some(tree_oid.clone());
        let commit = Commit::new(
            parent,
            tree_oid,
            author.clone(),
            author,
            "subject\n\nbody line".to_string(),
        );

        let payload = commit.serialize().unwrap();
        let parsed = Commit::deserialize(std::io::Cursor::new(payload)).unwrap();

        assert_eq!(parsed, commit);
        assert_eq!(parsed.short_message(), "subject");
    }

    #[rstest]
    #[case("+0000", 0)]
    #[case("+0900", 9 * 3600)]
    #[case("-0530", -(5 * 3600 + 30 * 60))]
    fn parses_offsets(#[case] offset: &str, #[case] seconds: i32) {
        assert_eq!(parse_offset(offset).unwrap().local_minus_utc(), seconds);
    }

    #[rstest]
    #[case("0900")]
    #[case("+09")]
    #[case("+09:00")]
    #[case("+0960")]
    #[case("")]
    fn rejects_malformed_offsets(#[case] offset: &str) {
        assert!(parse_offset(offset).is_none());
    }

    #[test]
    fn rejects_commit_without_tree() {
        let payload = "author a <a@b> 0 +0000\ncommitter a <a@b> 0 +0000\n\nmsg";

        assert!(matches!(
            Commit::deserialize(std::io::Cursor::new(payload)),
            Err(Error::MalformedPayload(ObjectType::Commit, _))
        ));
    }
}
