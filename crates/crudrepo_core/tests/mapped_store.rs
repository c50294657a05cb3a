mod common;

use common::{widget_connection, Widget, WidgetStore};
use crudrepo_core::{
    CrudRepository, Entity, ErrorKind, FindOptions, MappedStore, Repository, SortDirection,
    SqliteStore, Store,
};

/// Domain view of a widget with a required label.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    sku: String,
    label: String,
}

impl Entity for Part {
    const ID_FIELD: &'static str = "sku";
    const FIELDS: &'static [&'static str] = &["sku", "label"];

    fn id(&self) -> &str {
        &self.sku
    }
}

fn part_to_widget(part: &Part) -> Widget {
    Widget::new(&part.sku, &part.label)
}

fn widget_to_part(widget: Widget) -> Part {
    Part {
        sku: widget.id,
        label: widget.name.unwrap_or_default(),
    }
}

fn part_field_to_widget(field: &str) -> Option<&'static str> {
    match field {
        "sku" => Some("id"),
        "label" => Some("name"),
        _ => None,
    }
}

fn part_repository() -> Repository<Part, MappedStore<WidgetStore, Widget, Part>> {
    let store = SqliteStore::try_new(widget_connection(), "widgets").unwrap();
    Repository::new(
        MappedStore::new(store, part_to_widget, widget_to_part)
            .with_field_names(part_field_to_widget),
        "Part",
    )
}

fn part(sku: &str, label: &str) -> Part {
    Part {
        sku: sku.to_string(),
        label: label.to_string(),
    }
}

#[test]
fn mapped_repository_round_trips_domain_records() {
    let repo = part_repository();
    let part = Part {
        sku: "sku-1".to_string(),
        label: "hinge".to_string(),
    };

    assert_eq!(repo.create(&part).unwrap(), part);
    assert_eq!(repo.find_one("sku-1").unwrap(), part);
    assert_eq!(repo.find(&FindOptions::default()).unwrap(), vec![part.clone()]);

    let stored = repo.store().inner().find_by_key("sku-1").unwrap().unwrap();
    assert_eq!(stored, Widget::new("sku-1", "hinge"));
}

#[test]
fn mapped_repository_keeps_error_mapping() {
    let repo = part_repository();

    let err = repo.find_one("missing").unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Part not found for id: missing");

    assert!(repo.delete("missing").is_err());
}

#[test]
fn mapped_repository_orders_by_domain_fields() {
    let repo = part_repository();
    for (sku, label) in [("sku-1", "latch"), ("sku-2", "hinge"), ("sku-3", "spring")] {
        repo.create(&part(sku, label)).unwrap();
    }

    let labels: Vec<_> = repo
        .find(&FindOptions::page(0, 2).ordered_by("label", SortDirection::Desc))
        .unwrap()
        .into_iter()
        .map(|part| part.label)
        .collect();
    assert_eq!(labels, vec!["spring", "latch"]);

    let skus: Vec<_> = repo
        .find(&FindOptions::default().ordered_by("sku", SortDirection::Desc))
        .unwrap()
        .into_iter()
        .map(|part| part.sku)
        .collect();
    assert_eq!(skus, vec!["sku-3", "sku-2", "sku-1"]);
}

#[test]
fn stored_field_names_are_not_domain_order_fields() {
    let repo = part_repository();
    repo.create(&part("sku-1", "latch")).unwrap();

    let err = repo
        .find(&FindOptions::default().ordered_by("name", SortDirection::Asc))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidQuery);
}

#[test]
fn unmapped_order_field_fails_in_store() {
    let store = SqliteStore::try_new(widget_connection(), "widgets").unwrap();
    let mapped: MappedStore<WidgetStore, Widget, Part> =
        MappedStore::new(store, part_to_widget, widget_to_part)
            .with_field_names(|field| (field == "sku").then_some("id"));

    let err = mapped
        .find_many(&FindOptions::default().ordered_by("label", SortDirection::Asc))
        .unwrap_err();
    assert!(err.to_string().contains("order field `label`"), "error: {err}");

    assert!(mapped
        .find_many(&FindOptions::default().ordered_by("sku", SortDirection::Asc))
        .unwrap()
        .is_empty());
}
