use easy_set::{easy_set, wrap, ContainerKind, EasySetError, Node, Session, View};
use serde_json::json;

fn kind_at(session: &Session, path: &[&str]) -> Option<ContainerKind> {
    let doc = session.document();
    let mut current = doc.root();
    for field in path {
        match doc.get(current)?.get(field)? {
            Node::Container(id) => current = *id,
            Node::Scalar(_) => return None,
        }
    }
    Some(doc.get(current)?.kind())
}

#[test]
fn untyped_nested_index_leaves_holes() {
    let mut out = json!({});
    easy_set(&mut out, |a| a.at("b")?.at("c")?.index(2)?.set("b", json!({}))).unwrap();
    assert_eq!(out, json!({"b": {"c": [null, null, {"b": {}}]}}));

    let mut session = wrap(json!({})).unwrap();
    session.root().assign("b.c[2].b", json!({})).unwrap();
    assert_eq!(kind_at(&session, &["b", "c"]), Some(ContainerKind::Sequence));
    assert_eq!(session.lookup(&["b", "c", "0"]), None);
    assert_eq!(session.lookup(&["b", "c", "1"]), None);
    assert_eq!(session.lookup(&["b", "c", "2"]), Some(json!({"b": {}})));
}

#[test]
fn multiple_set_in_one_pass() {
    let mut out = json!({});
    easy_set(&mut out, |mut a| {
        a.reborrow().at("b")?.set("foo", "foo")?;
        a.reborrow().at("b")?.set("bar", "bar")?;
        a.at("x")?.set("y", "z")
    })
    .unwrap();
    assert_eq!(out, json!({"b": {"foo": "foo", "bar": "bar"}, "x": {"y": "z"}}));
}

#[test]
fn typed_object_with_sequence_of_objects() {
    let mut obj = json!({"z": "z"});
    easy_set(&mut obj, |mut o| {
        o.reborrow().at("a")?.at("b")?.at("c")?.set_index(0, json!({}))?;
        o.reborrow()
            .at("a")?
            .at("b")?
            .at("c")?
            .index(0)?
            .set("z", "intermediate")?;
        o.at_path("a.b.c[0].a.b")?.set("c", json!(["final"]))
    })
    .unwrap();

    assert_eq!(
        obj,
        json!({
            "z": "z",
            "a": {"b": {"c": [{"z": "intermediate", "a": {"b": {"c": ["final"]}}}]}}
        })
    );
}

#[test]
fn explicit_nulls_are_vivified() {
    let mut obj = json!({"z": null, "a": null});
    easy_set(&mut obj, |mut o| {
        o.reborrow().at("a")?.at("b")?.at("c")?.set_index(0, json!({}))?;
        o.reborrow().at_path("a.b.c[0]")?.set("z", "intermediate")?;
        o.at_path("a.b.c[0].a.b")?.set("c", json!(["final"]))
    })
    .unwrap();

    assert_eq!(
        obj,
        json!({
            "z": null,
            "a": {"b": {"c": [{"z": "intermediate", "a": {"b": {"c": ["final"]}}}]}}
        })
    );
}

#[test]
fn read_only_chain_materializes() {
    let mut obj = json!({});
    easy_set(&mut obj, |o| o.at("one")?.at("two")?.at("one").map(|_| ())).unwrap();
    assert_eq!(obj, json!({"one": {"two": {"one": {}}}}));
}

#[test]
fn preserves_pre_existing_numeric_key_field() {
    let mut obj = json!({"a": {}});
    easy_set(&mut obj, |o| o.at("a")?.set("3", json!({}))).unwrap();
    assert_eq!(obj, json!({"a": {"3": {}}}));
}

#[test]
fn stand_alone_session() {
    let mut session = wrap(json!({})).unwrap();
    session.root().at("a").unwrap().set("b", "foo").unwrap();
    session.root().at("a").unwrap().set("c", 1).unwrap();
    session.root().at_path("a.obj.a").unwrap().set("b", "bar").unwrap();

    let expected = json!({"a": {"b": "foo", "c": 1, "obj": {"a": {"b": "bar"}}}});
    assert_eq!(session.original(), expected);
    assert_eq!(
        session.root().get("easyOriginal").into_value(),
        expected
    );
    assert_eq!(session.into_value(), expected);
}

#[test]
fn string_key_on_sequence_fails() {
    let mut session = wrap(json!({})).unwrap();
    session.root().at("a").unwrap().set("0", "bar").unwrap();

    let err = session.root().at("a").unwrap().set("b", "foo").unwrap_err();
    assert_eq!(err, EasySetError::InvalidKeyKind { field: "b".into() });
    assert_eq!(session.original(), json!({"a": ["bar"]}));
}

#[test]
fn string_key_read_on_sequence_is_detached() {
    let mut session = wrap(json!({})).unwrap();
    session.root().at("a").unwrap().set("0", "bar").unwrap();

    let mut b = session.root().at("a").unwrap().at("b").unwrap();
    assert_eq!(b.kind(), ContainerKind::Mapping);
    b.set("c", 1).unwrap();
    assert_eq!(session.original(), json!({"a": ["bar"]}));
    assert_eq!(session.lookup(&["a", "b"]), None);

    // Reads still see the detached field later in the session.
    let c = session.root().at("a").unwrap().at("b").unwrap().get("c");
    assert_eq!(c.into_value(), json!(1));
}

#[test]
fn numeric_non_index_writes_on_sequence_are_detached() {
    let mut session = wrap(json!({"list": [1, 2]})).unwrap();
    for field in ["01", "-1", "1.5", "1e3"] {
        session.root().at("list").unwrap().set(field, "x").unwrap();
    }
    assert_eq!(session.original(), json!({"list": [1, 2]}));
}

#[test]
fn huge_index_write_is_sparse() {
    let mut session = wrap(json!({})).unwrap();
    session.root().at("a").unwrap().set("4294967294", 1).unwrap();
    assert_eq!(kind_at(&session, &["a"]), Some(ContainerKind::Sequence));
    assert_eq!(session.lookup(&["a", "4294967294"]), Some(json!(1)));
    assert_eq!(session.lookup(&["a", "0"]), None);
    let id = session.root().at("a").unwrap().id();
    let len = session.document().get(id).map(|container| container.len());
    assert_eq!(len, Some(4_294_967_295));
}

#[test]
fn index_past_the_limit_is_a_detached_property() {
    let mut session = wrap(json!({})).unwrap();
    session
        .root()
        .at("a")
        .unwrap()
        .set("18446744073709551615", 1)
        .unwrap();
    assert_eq!(session.original(), json!({"a": []}));

    let mut session = wrap(json!({"a": []})).unwrap();
    let view = session
        .root()
        .at("a")
        .unwrap()
        .at("18446744073709551615")
        .unwrap();
    assert_eq!(view.kind(), ContainerKind::Mapping);
    assert_eq!(session.original(), json!({"a": []}));
}

#[test]
fn read_past_end_of_sequence_vivifies_mapping() {
    let mut session = wrap(json!({"list": [1]})).unwrap();
    let view = session.root().at("list").unwrap().index(3).unwrap();
    assert_eq!(view.kind(), ContainerKind::Mapping);
    assert_eq!(session.original(), json!({"list": [1, null, null, {}]}));
}

#[test]
fn repeated_index_writes_through_one_view_accumulate() {
    let mut session = wrap(json!({})).unwrap();
    let mut list = session.root().at("list").unwrap();
    list.set_index(0, "a").unwrap();
    list.set_index(1, "b").unwrap();
    list.set_index(3, "d").unwrap();
    assert_eq!(list.kind(), ContainerKind::Sequence);
    assert_eq!(session.original(), json!({"list": ["a", "b", null, "d"]}));
}

#[test]
fn conversion_only_follows_a_creating_read() {
    // `a` already exists, so reading an index below it is a mapping key.
    let mut session = wrap(json!({"a": {}})).unwrap();
    session.root().at("a").unwrap().at("0").unwrap();
    assert_eq!(kind_at(&session, &["a"]), Some(ContainerKind::Mapping));

    // A non-index read in between clears the signal.
    let mut session = wrap(json!({})).unwrap();
    session.root().at("a").unwrap().at("x").unwrap();
    session.root().at("a").unwrap().at("0").unwrap();
    assert_eq!(session.original(), json!({"a": {"x": {}, "0": {}}}));
}

#[test]
fn conversion_targets_the_last_created_field() {
    // The index read happens on the root view, but the field the previous
    // read created is `a`, so `a` becomes the sequence that gets the slot.
    let mut session = wrap(json!({})).unwrap();
    session.root().at("a").unwrap();
    session.root().at("0").unwrap().set("x", 1).unwrap();
    assert_eq!(session.original(), json!({"a": [{"x": 1}]}));
}

#[test]
fn scalar_leaves_are_returned_unwrapped() {
    let mut session = wrap(json!({"n": 1, "s": "x", "b": false})).unwrap();
    for (field, expected) in [("n", json!(1)), ("s", json!("x")), ("b", json!(false))] {
        let access = session.root().get(field);
        assert!(!access.is_view());
        assert_eq!(access.into_value(), expected);
    }
    let err = session.root().at("s").unwrap_err();
    assert_eq!(err, EasySetError::NotAContainer { field: "s".into() });
}

#[test]
fn sequence_root_accepts_indices_only() {
    let mut session = wrap(json!([])).unwrap();
    session.root().index(1).unwrap().set("k", "v").unwrap();
    assert!(session.root().set("k", 1).is_err());
    assert_eq!(session.into_value(), json!([null, {"k": "v"}]));
}

#[test]
fn view_chain_can_be_bound_and_resumed() {
    let mut session = wrap(json!({})).unwrap();
    let mut b = session.root().at("b").unwrap();
    b.set("x", 1).unwrap();
    let mut deeper: View<'_> = b.reborrow().at("c").unwrap();
    deeper.set("y", 2).unwrap();
    b.set("z", 3).unwrap();
    assert_eq!(session.original(), json!({"b": {"x": 1, "c": {"y": 2}, "z": 3}}));
}

#[test]
fn foreign_container_id_is_not_found() {
    let mut big = wrap(json!({})).unwrap();
    let deep = big.root().at_path("a.b.c").unwrap().id();
    let small = wrap(json!({})).unwrap();
    assert!(small.document().get(deep).is_none());
    assert!(big.document().get(deep).is_some());
}
