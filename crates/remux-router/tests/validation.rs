//! Tests for pattern validation at registration time.

mod common;
use common::*;

use remux_router::{Pattern, PatternError, Router};

#[test]
fn rejects_alternation() {
    assert!(matches!(
        register_err("/a|/b"),
        PatternError::Unsupported {
            construct: "alternation",
            ..
        }
    ));
}

#[test]
fn rejects_quantifiers() {
    for pattern in ["/a+", "/a*", "/a?", "/a{2}", "/users/(?P<id>[0-9]+)/?"] {
        assert!(
            matches!(
                register_err(pattern),
                PatternError::Unsupported {
                    construct: "repetition",
                    ..
                }
            ),
            "pattern {pattern}"
        );
    }
}

#[test]
fn rejects_unnamed_group() {
    let err = register_err("(abc)");
    assert!(matches!(err, PatternError::UnnamedGroup { offset: 0 }));
    assert_eq!(
        err.to_string(),
        "top-level groupings must be named (offset 0)"
    );
}

#[test]
fn rejects_classes_and_anchors() {
    for (pattern, construct) in [
        ("/users/[0-9]", "character class"),
        ("/users/\\w", "character class"),
        ("/users/\\pL", "character class"),
        ("/users/.", "wildcard `.`"),
        ("/users$", "anchor"),
        ("\\A/users", "anchor"),
    ] {
        match register_err(pattern) {
            PatternError::Unsupported { construct: found, .. } => {
                assert_eq!(found, construct, "pattern {pattern}");
            }
            other => panic!("Expected unsupported {construct} for {pattern}, got {other:?}"),
        }
    }
}

#[test]
fn rejects_invalid_syntax() {
    for pattern in ["/users/(?P<id>[0-9]+", "/users/(?P<>x)", "/users/[0-9"] {
        assert!(
            matches!(register_err(pattern), PatternError::Syntax(_)),
            "pattern {pattern}"
        );
    }
}

#[test]
fn accepts_literals_and_named_groups() {
    let mut router = Router::new();
    for pattern in [
        "",
        "/",
        "/users",
        "/users/(?P<id>[0-9]+)",
        "/users/(?<id>[0-9]+)",
        "/(?P<a>x|y)(?P<b>z*)",
        "/search/(?P<q>(?:[a-z]+-)*[a-z]+)",
        "/caf\u{e9}",
    ] {
        assert!(router.route(pattern, echo_params).is_ok(), "pattern {pattern}");
    }
    assert_eq!(router.len(), 8);
}

#[test]
fn failed_registration_leaves_table_untouched() {
    let mut router = Router::new();
    router.route("/ok", echo_params).unwrap();
    assert!(router.route("/bad+", echo_params).is_err());
    assert_eq!(router.len(), 1);
    assert_eq!(router.routes()[0].pattern().as_str(), "/ok");
}

#[test]
fn pattern_and_matcher_share_source() {
    let pattern = Pattern::parse("/users/(?P<id>[0-9]+)").unwrap();
    assert_eq!(pattern.to_string(), "/users/(?P<id>[0-9]+)");
    assert_eq!(pattern.param_names().collect::<Vec<_>>(), ["id"]);
}
