//! Integration test: convention-based mapping
//!
//! Maps object graphs with no registered relations and checks the field
//! copying rules for values, nested objects and lists.

use chrono::NaiveDate;
use objmap_core::{Fields, Mappable, MapperConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct Sub {
    age: i32,
}

impl Mappable for Sub {
    fn describe(fields: &mut Fields<Self>) {
        fields.value("Age", |s| &s.age, |s| &mut s.age);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct SubView {
    age: i32,
}

impl Mappable for SubView {
    fn describe(fields: &mut Fields<Self>) {
        fields.value("Age", |s| &s.age, |s| &mut s.age);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    id: Uuid,
    name: String,
    born: Option<NaiveDate>,
    sub: Option<Sub>,
    subs: Vec<Option<Sub>>,
}

impl Person {
    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.subs.len())
    }
}

impl Mappable for Person {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .value("Id", |p| &p.id, |p| &mut p.id)
            .value("Name", |p| &p.name, |p| &mut p.name)
            .value("Born", |p| &p.born, |p| &mut p.born)
            .object("Sub", |p| &p.sub, |p| &mut p.sub)
            .nullable_list("Subs", |p| &p.subs, |p| &mut p.subs)
            .computed("DisplayName", Person::display_name);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct PersonView {
    #[serde(skip)]
    id: Uuid,
    name: String,
    display_name: String,
    born: Option<NaiveDate>,
    sub: Option<SubView>,
    subs: Vec<Option<SubView>>,
}

impl Mappable for PersonView {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .value("Id", |p| &p.id, |p| &mut p.id)
            .value("Name", |p| &p.name, |p| &mut p.name)
            .value("DisplayName", |p| &p.display_name, |p| &mut p.display_name)
            .value("Born", |p| &p.born, |p| &mut p.born)
            .object("Sub", |p| &p.sub, |p| &mut p.sub)
            .nullable_list("Subs", |p| &p.subs, |p| &mut p.subs);
    }
}

fn sample() -> Person {
    Person {
        id: Uuid::new_v4(),
        name: "A".to_string(),
        born: NaiveDate::from_ymd_opt(1990, 4, 1),
        sub: Some(Sub { age: 18 }),
        subs: vec![Some(Sub { age: 18 }), Some(Sub { age: 19 })],
    }
}

#[test]
fn test_example_scenario() -> anyhow::Result<()> {
    init_tracing();
    let mapper = MapperConfig::new().mapper();

    let view: PersonView = mapper.map(&sample())?;

    assert_eq!(
        serde_json::to_value(&view)?,
        serde_json::json!({
            "name": "A",
            "display_name": "",
            "born": "1990-04-01",
            "sub": { "age": 18 },
            "subs": [{ "age": 18 }, { "age": 19 }]
        })
    );
    Ok(())
}

#[test]
fn test_identical_shapes_copy_simple_fields() -> anyhow::Result<()> {
    init_tracing();
    let mapper = MapperConfig::new().mapper();
    let source = sample();

    let copy: Person = mapper.map(&source)?;
    assert_eq!(copy, source);

    let view: PersonView = mapper.map(&source)?;
    assert_eq!(view.id, source.id);
    assert_eq!(view.born, source.born);
    Ok(())
}

#[test]
fn test_computed_member_never_written() -> anyhow::Result<()> {
    init_tracing();
    let mapper = MapperConfig::new().mapper();
    let mut view = PersonView {
        display_name: "kept".to_string(),
        ..PersonView::default()
    };

    mapper.map_into(&sample(), &mut view)?;
    assert_eq!(view.display_name, "kept");
    Ok(())
}

#[test]
fn test_null_nested_source_preserves_target() -> anyhow::Result<()> {
    init_tracing();
    let mapper = MapperConfig::new().mapper();
    let source = Person {
        sub: None,
        ..sample()
    };
    let mut view = PersonView {
        sub: Some(SubView { age: 77 }),
        ..PersonView::default()
    };

    mapper.map_into(&source, &mut view)?;
    assert_eq!(view.sub, Some(SubView { age: 77 }));
    assert_eq!(view.name, "A");
    Ok(())
}

#[test]
fn test_null_nested_target_is_allocated() -> anyhow::Result<()> {
    init_tracing();
    let mapper = MapperConfig::new().mapper();
    let mut view = PersonView::default();
    assert!(view.sub.is_none());

    mapper.map_into(&sample(), &mut view)?;
    assert_eq!(view.sub, Some(SubView { age: 18 }));
    Ok(())
}

#[test]
fn test_existing_nested_target_mapped_in_place() -> anyhow::Result<()> {
    init_tracing();

    #[derive(Debug, Default, PartialEq)]
    struct Tagged {
        age: i32,
        tag: String,
    }

    impl Mappable for Tagged {
        fn describe(fields: &mut Fields<Self>) {
            fields
                .value("Age", |t| &t.age, |t| &mut t.age)
                .value("Tag", |t| &t.tag, |t| &mut t.tag);
        }
    }

    #[derive(Debug, Default)]
    struct Holder {
        sub: Option<Tagged>,
    }

    impl Mappable for Holder {
        fn describe(fields: &mut Fields<Self>) {
            fields.object("Sub", |h| &h.sub, |h| &mut h.sub);
        }
    }

    let mapper = MapperConfig::new().mapper();
    let mut holder = Holder {
        sub: Some(Tagged {
            age: 1,
            tag: "kept".to_string(),
        }),
    };

    mapper.map_into(&sample(), &mut holder)?;
    assert_eq!(
        holder.sub,
        Some(Tagged {
            age: 18,
            tag: "kept".to_string()
        })
    );
    Ok(())
}

#[test]
fn test_list_replaced_wholesale() -> anyhow::Result<()> {
    init_tracing();
    let mapper = MapperConfig::new().mapper();

    let source = Person {
        subs: vec![Some(Sub { age: 1 }), None, Some(Sub { age: 3 })],
        ..sample()
    };
    let mut view = PersonView {
        subs: vec![Some(SubView { age: 9 }); 5],
        ..PersonView::default()
    };
    mapper.map_into(&source, &mut view)?;
    assert_eq!(
        view.subs,
        vec![Some(SubView { age: 1 }), None, Some(SubView { age: 3 })]
    );

    let empty = Person {
        subs: Vec::new(),
        ..sample()
    };
    mapper.map_into(&empty, &mut view)?;
    assert!(view.subs.is_empty());
    Ok(())
}

#[test]
fn test_simple_lists_copy_values() -> anyhow::Result<()> {
    init_tracing();

    #[derive(Debug, Default)]
    struct Scores {
        values: Vec<i64>,
        notes: Vec<Option<String>>,
    }

    impl Mappable for Scores {
        fn describe(fields: &mut Fields<Self>) {
            fields
                .list("Values", |s| &s.values, |s| &mut s.values)
                .list("Notes", |s| &s.notes, |s| &mut s.notes);
        }
    }

    #[derive(Debug, Default)]
    struct ScoresView {
        values: Vec<i64>,
        notes: Vec<Option<String>>,
    }

    impl Mappable for ScoresView {
        fn describe(fields: &mut Fields<Self>) {
            fields
                .list("Values", |s| &s.values, |s| &mut s.values)
                .list("Notes", |s| &s.notes, |s| &mut s.notes);
        }
    }

    let mapper = MapperConfig::new().mapper();
    let source = Scores {
        values: vec![3, 1, 2],
        notes: vec![Some("ok".to_string()), None],
    };

    let view: ScoresView = mapper.map(&source)?;
    assert_eq!(view.values, vec![3, 1, 2]);
    assert_eq!(view.notes, vec![Some("ok".to_string()), None]);
    Ok(())
}

#[test]
fn test_field_names_are_case_sensitive() -> anyhow::Result<()> {
    init_tracing();

    #[derive(Debug, Default)]
    struct Lower {
        name: String,
    }

    impl Mappable for Lower {
        fn describe(fields: &mut Fields<Self>) {
            fields.value("name", |l| &l.name, |l| &mut l.name);
        }
    }

    let mapper = MapperConfig::new().mapper();
    let lower: Lower = mapper.map(&sample())?;
    assert_eq!(lower.name, "");
    Ok(())
}

#[test]
fn test_write_only_target_receives_value() -> anyhow::Result<()> {
    init_tracing();

    #[derive(Debug, Default)]
    struct Sink {
        received: Vec<String>,
    }

    impl Mappable for Sink {
        fn describe(fields: &mut Fields<Self>) {
            fields.write_only("Name", |s: &mut Sink, name: String| s.received.push(name));
        }
    }

    let mapper = MapperConfig::new().mapper();
    let sink: Sink = mapper.map(&sample())?;
    assert_eq!(sink.received, vec!["A".to_string()]);
    Ok(())
}
