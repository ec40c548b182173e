use std::sync::Arc;

use textview::freezable::{Freezable, clone_for_edit, freeze_and_return, get_frozen_clone};
use textview::rendering::{LineSegment, render_document, to_markup};
use textview::{TextDocument, TextEditorOptions, linkify};

#[test]
fn userinfo_in_link_is_not_split_into_mail() {
    let output = linkify("go to http://user@example.com/x please", None);
    assert_eq!(
        output,
        "go to [http://user@example.com/x](http://user@example.com/x) please"
    );
}

#[test]
fn line_endings_are_preserved() {
    assert_eq!(
        linkify("a www.x.com\r\nb\nc\r\n", None),
        "a [www.x.com](http://www.x.com)\r\nb\nc\r\n"
    );
}

#[test]
fn linkify_inline_snapshot() {
    insta::assert_snapshot!(
        linkify("visit http://example.com/page today", None),
        @"visit [http://example.com/page](http://example.com/page) today"
    );
}

#[test]
fn links_can_be_turned_off() {
    let options =
        TextEditorOptions::from_toml_str("enable-hyperlinks = false\nenable-email-hyperlinks = false")
            .unwrap();
    let input = "www.example.com and me@example.com";
    assert_eq!(linkify(input, Some(options)), input);
}

#[test]
fn frozen_options_are_shared_across_lines() {
    let document = TextDocument::new("www.a.com\nplain\nme@example.com");
    let options = Arc::new(freeze_and_return(TextEditorOptions::default()));

    let lines = render_document(&document, &options);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], vec![LineSegment::Text(10..15)]);

    let LineSegment::Element(mail) = &lines[2][0] else {
        panic!("expected a mail element, got {:?}", lines[2]);
    };
    assert_eq!(mail.offset, 16);
    assert_eq!(mail.navigate_uri, "mailto:me@example.com");
    assert_eq!(
        to_markup(&document, &lines[0]),
        "[www.a.com](http://www.a.com)"
    );
}

#[test]
fn editing_a_frozen_snapshot_goes_through_a_copy() {
    let live = Arc::new(TextEditorOptions::default());
    let snapshot = get_frozen_clone(&live);
    assert!(snapshot.is_frozen());
    assert!(Arc::ptr_eq(&snapshot, &get_frozen_clone(&snapshot)));

    let mut edited = clone_for_edit(&*snapshot);
    assert!(!edited.is_frozen());
    edited.set_require_control_for_hyperlink_click(false).unwrap();

    let output = linkify("www.a.com", Some(edited));
    assert_eq!(output, "[www.a.com](http://www.a.com)");
    assert!(snapshot.require_control_for_hyperlink_click());
}
