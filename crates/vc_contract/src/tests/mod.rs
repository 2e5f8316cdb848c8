//! End-to-end behavior of derived contracts.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::registry::RecordType;
use crate::{Contract, ContractError, DynamicRecord, Record, Value};

fn json(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

fn positive(value: &Value) -> bool {
    value.to_number() > 0.0
}

fn times_ten(value: &Value) -> Value {
    Value::from(value.to_number() * 10.0)
}

fn tenth(value: &Value) -> Value {
    Value::from(value.to_number() / 10.0)
}

fn invalid(err: ContractError) -> (String, Value) {
    match err {
        ContractError::InvalidValue { path, value } => (path, value),
        other => panic!("unexpected error: {other}"),
    }
}

// -----------------------------------------------------------------------------
// Basic

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Release {
    #[member]
    version: String,
    #[member]
    takes: f64,
}

#[test]
fn basic() {
    let release = Release {
        version: "4.0".into(),
        takes: 100.0,
    };
    let text = r#"{"version":"4.0","takes":100}"#;

    assert_eq!(release.to_tree(), json(text));
    assert_eq!(release.to_json().unwrap(), text);
    assert_eq!(Release::decode(&json(text)).unwrap(), release);
    assert_eq!(Release::from_json(text).unwrap().to_json().unwrap(), text);

    // Numbers arrive as text too.
    let loose = r#"{"version":"4.0","takes":"100"}"#;
    assert_eq!(Release::decode(&json(loose)).unwrap(), release);
    assert_eq!(Release::from_json(loose).unwrap().to_json().unwrap(), text);

    // The base type declares nothing and serializes to nothing.
    let untyped = DynamicRecord::from_tree(&json(loose)).unwrap();
    assert_eq!(untyped.to_tree(), json("{}"));
    assert_eq!(untyped.field("takes"), Some(Value::from("100")));
}

#[derive(Contract, Clone, Debug, PartialEq)]
struct Defaulted {
    #[member]
    version: String,
    #[member]
    takes: f64,
}

impl Default for Defaulted {
    fn default() -> Self {
        Self {
            version: String::new(),
            takes: 100.0,
        }
    }
}

#[test]
fn initial_values() {
    let defaulted = Defaulted {
        version: "4.0".into(),
        ..Default::default()
    };
    assert_eq!(defaulted.to_tree(), json(r#"{"version":"4.0","takes":100}"#));

    let decoded = Defaulted::decode(&json(r#"{"version":"4.0"}"#)).unwrap();
    assert_eq!(decoded.takes, 100.0);

    let decoded = Defaulted::decode(&json(r#"{"version":"4.0","takes":10}"#)).unwrap();
    assert_eq!(decoded.to_json().unwrap(), r#"{"version":"4.0","takes":10}"#);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Sparse {
    #[member]
    version: Option<String>,
    #[member]
    takes: Option<f64>,
}

#[test]
fn absent_values() {
    let sparse = Sparse {
        version: Some("4.0".into()),
        takes: None,
    };
    let text = r#"{"version":"4.0"}"#;
    assert_eq!(sparse.to_json().unwrap(), text);

    let decoded = Sparse::decode(&json(text)).unwrap();
    assert_eq!(decoded, sparse);
    assert_eq!(decoded.field("takes"), None);

    // An explicit null reads back as absent.
    let decoded = Sparse::decode(&json(r#"{"version":"4.0","takes":null}"#)).unwrap();
    assert_eq!(decoded.takes, None);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Nullable {
    #[member]
    version: String,
    #[member(kind = number)]
    takes: Value,
}

#[test]
fn null_values() {
    let nullable = Nullable {
        version: "4.0".into(),
        takes: Value::Null,
    };
    let text = r#"{"version":"4.0","takes":null}"#;
    assert_eq!(nullable.to_json().unwrap(), text);

    let decoded = Nullable::decode(&json(text)).unwrap();
    assert!(decoded.takes.is_null());
    assert_eq!(decoded.to_json().unwrap(), text);

    let decoded = Nullable::decode(&json(r#"{"takes":"100"}"#)).unwrap();
    assert_eq!(decoded.takes, Value::from(100));
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Untyped {
    #[member]
    version: String,
    #[member]
    takes: Value,
}

#[test]
fn unspecified_kind() {
    let text = r#"{"version":"4.0","takes":100}"#;
    let decoded = Untyped::decode(&json(text)).unwrap();
    assert_eq!(decoded.takes, Value::from(100));
    assert_eq!(decoded.to_json().unwrap(), text);

    // Kept as-is, no coercion.
    let text = r#"{"version":"4.0","takes":"100"}"#;
    let decoded = Untyped::decode(&json(text)).unwrap();
    assert_eq!(decoded.takes, Value::from("100"));
    assert_eq!(decoded.to_json().unwrap(), text);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Aliased {
    #[member]
    version: String,
    #[member(name = "alias")]
    takes: f64,
}

#[test]
fn exposed_name() {
    let aliased = Aliased {
        version: "4.0".into(),
        takes: 100.0,
    };
    let text = r#"{"version":"4.0","alias":100}"#;
    assert_eq!(aliased.to_json().unwrap(), text);
    assert_eq!(Aliased::decode(&json(text)).unwrap(), aliased);
    assert_eq!(
        Aliased::decode(&json(r#"{"version":"4.0","alias":"100"}"#)).unwrap(),
        aliased
    );

    // Internal names are not part of the wire format.
    let decoded = Aliased::decode(&json(r#"{"takes":5}"#)).unwrap();
    assert_eq!(decoded.takes, 0.0);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Hooked {
    #[member]
    version: String,
    #[member(name = "alias", serialize = times_ten, deserialize = tenth)]
    takes: f64,
}

#[test]
fn custom_hooks() {
    let hooked = Hooked {
        version: "4.0".into(),
        takes: 100.0,
    };
    let text = r#"{"version":"4.0","alias":1000}"#;
    assert_eq!(hooked.to_json().unwrap(), text);
    assert_eq!(Hooked::decode(&json(text)).unwrap(), hooked);

    let loose = r#"{"version":"4.0","alias":"1000"}"#;
    assert_eq!(Hooked::decode(&json(loose)).unwrap(), hooked);
    assert_eq!(Hooked::from_json(loose).unwrap().to_json().unwrap(), text);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Directed {
    #[member(direction = deserialize_only)]
    donly: Option<f64>,
    #[member(direction = serialize_only)]
    sonly: Option<f64>,
    #[member(direction = ignore)]
    ignore: Option<f64>,
    #[member(direction = both)]
    both: Option<f64>,
}

#[test]
fn directions() {
    let directed = Directed {
        donly: Some(1.0),
        sonly: Some(2.0),
        ignore: Some(3.0),
        both: Some(4.0),
    };
    assert_eq!(directed.to_json().unwrap(), r#"{"sonly":2,"both":4}"#);

    let decoded = Directed::decode(&json(r#"{"donly":1,"sonly":2,"ignore":3,"both":4}"#)).unwrap();
    assert_eq!(
        decoded,
        Directed {
            donly: Some(1.0),
            sonly: None,
            ignore: None,
            both: Some(4.0),
        }
    );
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Checked {
    #[member]
    version: String,
    #[member(validate = positive)]
    takes: f64,
}

#[test]
fn validators() {
    let mut checked = Checked {
        version: "4.0".into(),
        takes: 2.0,
    };
    assert_eq!(checked.find_first_invalid_field(), None);
    assert!(checked.validate().is_ok());

    checked.takes = -1.0;
    assert_eq!(
        checked.find_first_invalid_field(),
        Some((String::from("takes"), Value::from(-1)))
    );

    let err = checked.validate().unwrap_err();
    assert_eq!(err.to_string(), r#"Value "-1" is not valid for member "takes""#);
    assert_eq!(invalid(err), (String::from("takes"), Value::from(-1)));
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Mandatory {
    #[member]
    version: String,
    #[member(required)]
    takes: Option<f64>,
}

#[test]
fn required() {
    let mandatory = Mandatory {
        version: "4.0".into(),
        takes: None,
    };
    assert_eq!(
        mandatory.find_first_invalid_field(),
        Some((String::from("takes"), Value::Null))
    );
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Listed {
    #[member]
    version: String,
    #[member(item = number)]
    takes: Vec<f64>,
}

#[test]
fn sequences() {
    let listed = Listed {
        version: "4.0".into(),
        takes: vec![1.0, 2.0],
    };
    assert_eq!(listed.to_json().unwrap(), r#"{"version":"4.0","takes":[1,2]}"#);

    let decoded = Listed::decode(&json(r#"{"version":"4.0","takes":["1",2]}"#)).unwrap();
    assert_eq!(decoded, listed);

    let err = Listed::decode(&json(r#"{"takes":["x"]}"#)).unwrap_err();
    assert_eq!(invalid(err), (String::from("takes.item"), Value::from("x")));

    let err = Listed::decode(&json(r#"{"takes":1}"#)).unwrap_err();
    assert_eq!(invalid(err), (String::from("takes"), Value::from(1)));
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Keyed {
    #[member]
    version: String,
    #[member(key = number, value = string)]
    takes: BTreeMap<i64, String>,
}

#[test]
fn keyed_maps() {
    let keyed = Keyed {
        version: "4.0".into(),
        takes: BTreeMap::from([(1, "1".into()), (2, "2".into())]),
    };
    assert_eq!(
        keyed.to_json().unwrap(),
        r#"{"version":"4.0","takes":{"1":"1","2":"2"}}"#
    );

    let decoded = Keyed::decode(&json(r#"{"version":"4.0","takes":{"1":"1","2":2}}"#)).unwrap();
    assert_eq!(decoded, keyed);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Loose {
    #[member(item = any)]
    takes: Vec<f64>,
    #[member(key = any, value = any)]
    ids: BTreeMap<i64, String>,
    #[member(key = number, value = any)]
    names: BTreeMap<i64, String>,
}

#[test]
fn rejected_elements() {
    let err = Loose::decode(&json(r#"{"takes":[1,"x"]}"#)).unwrap_err();
    assert_eq!(invalid(err), (String::from("takes.item"), Value::from("x")));

    let err = Loose::decode(&json(r#"{"ids":{"x":"a"}}"#)).unwrap_err();
    assert_eq!(invalid(err), (String::from("ids.key"), Value::from("x")));

    let err = Loose::decode(&json(r#"{"names":{"1":2}}"#)).unwrap_err();
    assert_eq!(invalid(err), (String::from("names.value"), Value::from(2)));

    let decoded = Loose::decode(&json(r#"{"takes":[1,2],"names":{"1":"a"}}"#)).unwrap();
    assert_eq!(decoded.takes, vec![1.0, 2.0]);
    assert_eq!(decoded.names, BTreeMap::from([(1, String::from("a"))]));
}

// -----------------------------------------------------------------------------
// Nested

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Nested {
    #[member]
    x: String,
    #[member(validate = positive)]
    y: f64,
}

fn nested(x: &str, y: f64) -> Nested {
    Nested { x: x.into(), y }
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct WithNested {
    #[member]
    version: String,
    #[member]
    nested: Option<Nested>,
}

#[test]
fn nested_record() {
    let mut outer = WithNested {
        version: "4.0".into(),
        nested: Some(nested("x", 2.0)),
    };
    assert_eq!(outer.find_first_invalid_field(), None);

    let text = r#"{"version":"4.0","nested":{"x":"x","y":2}}"#;
    assert_eq!(outer.to_tree(), json(text));
    assert_eq!(outer.to_json().unwrap(), text);
    assert_eq!(WithNested::decode(&json(text)).unwrap(), outer);
    assert_eq!(WithNested::from_json(text).unwrap().to_json().unwrap(), text);

    if let Some(inner) = outer.nested.as_mut() {
        inner.y = -1.0;
    }
    assert_eq!(
        outer.find_first_invalid_field(),
        Some((String::from("nested.y"), Value::from(-1)))
    );
    let err = outer.validate().unwrap_err();
    assert_eq!(err.path(), Some("nested.y"));

    // Errors inside a nested tree carry the full path.
    let err = WithNested::decode(&json(r#"{"nested":{"y":"abc"}}"#)).unwrap_err();
    assert_eq!(invalid(err), (String::from("nested.y"), Value::from("abc")));

    let err = WithNested::decode(&json(r#"{"nested":[1]}"#)).unwrap_err();
    assert_eq!(err.path(), Some("nested"));
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct NestedList {
    #[member]
    version: String,
    #[member(item = Nested)]
    nested: Vec<Nested>,
}

#[test]
fn nested_sequence() {
    let mut outer = NestedList {
        version: "4.0".into(),
        nested: vec![
            Nested::decode(&json(r#"{"x":"x","y":2}"#)).unwrap(),
            Nested::decode(&json(r#"{"x":"y","y":3}"#)).unwrap(),
        ],
    };
    assert_eq!(outer.find_first_invalid_field(), None);

    let text = r#"{"version":"4.0","nested":[{"x":"x","y":2},{"x":"y","y":3}]}"#;
    assert_eq!(outer.to_json().unwrap(), text);

    let decoded = NestedList::decode(&json(text)).unwrap();
    assert_eq!(decoded.nested, vec![nested("x", 2.0), nested("y", 3.0)]);
    assert_eq!(NestedList::from_json(text).unwrap().to_json().unwrap(), text);

    outer.nested[1].y = -1.0;
    assert_eq!(
        outer.find_first_invalid_field(),
        Some((String::from("nested.item.y"), Value::from(-1)))
    );
    assert_eq!(outer.validate().unwrap_err().path(), Some("nested.item.y"));
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct NestedMap {
    #[member]
    version: String,
    #[member(key = number, value = Nested)]
    nested: BTreeMap<i64, Nested>,
}

#[test]
fn nested_keyed_map() {
    let mut outer = NestedMap {
        version: "4.0".into(),
        nested: BTreeMap::from([(1, nested("x", 2.0)), (2, nested("y", 3.0))]),
    };
    assert_eq!(outer.find_first_invalid_field(), None);

    let text = r#"{"version":"4.0","nested":{"1":{"x":"x","y":2},"2":{"x":"y","y":3}}}"#;
    assert_eq!(outer.to_json().unwrap(), text);

    let decoded = NestedMap::decode(&json(text)).unwrap();
    assert_eq!(decoded, outer);

    if let Some(inner) = outer.nested.get_mut(&1) {
        inner.y = -1.0;
    }
    assert_eq!(
        outer.find_first_invalid_field(),
        Some((String::from("nested.value.y"), Value::from(-1)))
    );
}

// -----------------------------------------------------------------------------
// Inheritance

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Point {
    #[member]
    x: String,
    #[member(validate = positive)]
    y: f64,
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
#[contract(extends = Point)]
struct Versioned {
    #[contract(base)]
    base: Point,
    #[member]
    version: String,
}

#[test]
fn subtype() {
    let mut versioned = Versioned {
        base: Point {
            x: "x".into(),
            y: 2.0,
        },
        version: "4.0".into(),
    };
    assert!(Versioned::contract_type().is_subtype_of(Point::contract_type()));
    assert_eq!(versioned.find_first_invalid_field(), None);

    let text = r#"{"version":"4.0","x":"x","y":2}"#;
    assert_eq!(versioned.to_json().unwrap(), text);
    assert_eq!(Versioned::decode(&json(text)).unwrap(), versioned);
    assert_eq!(versioned.field("x"), Some(Value::from("x")));

    versioned.base.y = -1.0;
    assert_eq!(
        versioned.find_first_invalid_field(),
        Some((String::from("y"), Value::from(-1)))
    );
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Renamed {
    #[contract(base)]
    base: Point,
    #[member(name = "ay")]
    y: f64,
}

#[test]
fn override_member() {
    let mut renamed = Renamed {
        base: Point {
            x: "x".into(),
            y: 0.0,
        },
        y: 2.0,
    };
    assert_eq!(Renamed::contract_type().parent(), Some(Point::contract_type()));
    assert_eq!(renamed.find_first_invalid_field(), None);
    assert_eq!(renamed.to_tree(), json(r#"{"x":"x","ay":2}"#));
    assert_eq!(renamed.to_json().unwrap(), r#"{"ay":2,"x":"x"}"#);

    // The overriding member drops the inherited validator.
    renamed.y = -1.0;
    assert_eq!(renamed.find_first_invalid_field(), None);
}

fn select_shape(requested: RecordType, tree: &Value) -> RecordType {
    match tree.get("type").and_then(Value::as_str) {
        None | Some("") => requested,
        Some("A") => ShapeA::contract_type(),
        Some(_) => ShapeB::contract_type(),
    }
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
#[contract(resolve = select_shape)]
struct Shape {
    #[member(name = "type")]
    kind: String,
}

#[derive(Contract, Clone, Debug, PartialEq)]
#[contract(extends = Shape)]
struct ShapeA {
    #[contract(base)]
    base: Shape,
    #[member]
    a: Option<String>,
}

impl Default for ShapeA {
    fn default() -> Self {
        Self {
            base: Shape { kind: "A".into() },
            a: None,
        }
    }
}

#[derive(Contract, Clone, Debug, PartialEq)]
#[contract(extends = Shape)]
struct ShapeB {
    #[contract(base)]
    base: Shape,
    #[member]
    b: Option<f64>,
}

impl Default for ShapeB {
    fn default() -> Self {
        Self {
            base: Shape { kind: "B".into() },
            b: None,
        }
    }
}

#[derive(Contract, Default, Clone, Debug)]
struct Holder {
    #[member(item = Shape)]
    data: Vec<Box<dyn Record>>,
}

#[test]
fn polymorphic_selection() {
    let mut holder = Holder::default();
    holder.data.push(ShapeA::from_tree(&json(r#"{"a":"a"}"#)).unwrap());
    holder.data.push(ShapeB::from_tree(&json(r#"{"b":1}"#)).unwrap());

    let expected = json(r#"{"data":[{"type":"A","a":"a"},{"type":"B","b":1}]}"#);
    assert_eq!(holder.to_tree(), expected);
    assert_eq!(
        holder.to_json().unwrap(),
        r#"{"data":[{"a":"a","type":"A"},{"b":1,"type":"B"}]}"#
    );

    let decoded = Holder::decode(&expected).unwrap();
    assert_eq!(decoded.data.len(), 2);

    let a = decoded.data[0].downcast_ref::<ShapeA>().unwrap();
    assert_eq!(a.base.kind, "A");
    assert_eq!(a.a.as_deref(), Some("a"));

    let b = decoded.data[1].downcast_ref::<ShapeB>().unwrap();
    assert_eq!(b.base.kind, "B");
    assert_eq!(b.b, Some(1.0));

    // Without a discriminator the requested type is kept.
    let shape = Shape::from_tree(&json("{}")).unwrap();
    assert!(shape.is::<Shape>());

    let err = Shape::decode(&json(r#"{"type":"B","b":2}"#)).unwrap_err();
    assert!(matches!(
        err,
        ContractError::TypeMismatch { expected, found }
            if expected == Shape::contract_type() && found == ShapeB::contract_type()
    ));
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Search {
    #[member]
    query: String,
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
#[contract(extends = Search)]
struct Paged {
    #[contract(base)]
    search: Search,
    #[member(name = "page_index")]
    index: f64,
    #[member(name = "page_size", validate = positive)]
    size: f64,
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
#[contract(extends = Paged)]
struct Listing {
    #[contract(base)]
    paged: Paged,
    #[member]
    version: String,
}

#[test]
fn ancestor_chain() {
    let mut listing = Listing {
        paged: Paged {
            search: Search { query: "q".into() },
            index: 1.0,
            size: 10.0,
        },
        version: "4.0".into(),
    };
    assert_eq!(listing.find_first_invalid_field(), None);

    let text = r#"{"version":"4.0","page_index":1,"page_size":10,"query":"q"}"#;
    assert_eq!(listing.to_json().unwrap(), text);
    assert_eq!(
        listing.to_tree(),
        json(r#"{"version":"4.0","query":"q","page_index":1,"page_size":10}"#)
    );
    assert_eq!(Listing::decode(&json(text)).unwrap(), listing);

    let ancestors: Vec<RecordType> = Listing::contract_type().ancestors().collect();
    assert_eq!(
        ancestors,
        vec![
            Listing::contract_type(),
            Paged::contract_type(),
            Search::contract_type(),
            RecordType::base()
        ]
    );

    listing.paged.size = -1.0;
    assert_eq!(
        listing.find_first_invalid_field(),
        Some((String::from("page_size"), Value::from(-1)))
    );
}

// -----------------------------------------------------------------------------
// Special

#[derive(Contract, Default, Clone, Debug, PartialEq)]
struct Partial {
    version: String,
    #[member]
    takes: f64,
}

#[test]
fn undeclared_fields() {
    let partial = Partial {
        version: "4.0".into(),
        takes: 100.0,
    };
    assert_eq!(partial.to_json().unwrap(), r#"{"takes":100}"#);
    assert_eq!(partial.field("version"), None);

    let decoded = Partial::decode(&json(r#"{"version":"4.0","takes":100}"#)).unwrap();
    assert_eq!(decoded.version, "");
    assert_eq!(decoded.takes, 100.0);
    assert_eq!(decoded.to_json().unwrap(), r#"{"takes":100}"#);
}

#[derive(Contract, Default, Clone, Debug, PartialEq)]
#[contract(name = "scenario::Registered", auto_register)]
struct Registered {
    #[member(kind = timestamp)]
    at: Value,
}

#[test]
fn registered_by_name() {
    let ty = Registered::contract_type();
    assert_eq!(ty.name(), "scenario::Registered");
    assert_eq!(crate::registry::find_type("scenario::Registered"), Some(ty));

    #[cfg(feature = "auto_register")]
    assert!(crate::registry::auto_register() >= 1);

    let record = Registered::decode(&json(r#"{"at":"1970-01-01T00:00:01Z"}"#)).unwrap();
    assert_eq!(record.to_json().unwrap(), r#"{"at":"1970-01-01T00:00:01.000Z"}"#);

    let err = Registered::decode(&json(r#"{"at":"yesterday"}"#)).unwrap_err();
    assert_eq!(err.path(), Some("at"));
}

#[test]
fn record_objects() {
    let release: Box<dyn Record> = Box::new(Release {
        version: "4.0".into(),
        takes: 1.0,
    });
    let copy = release.clone();
    assert_eq!(&*copy, &*release);
    assert!(copy.is::<Release>());
    assert!(copy.downcast::<Checked>().is_err());

    let mut release = Release::default();
    assert_eq!(release.set_field("takes", Value::from("1")), Err(Value::from("1")));
    assert_eq!(release.set_field("unknown", Value::from(1)), Err(Value::from(1)));
    release.set_field("takes", Value::from(3)).unwrap();
    assert_eq!(release.takes, 3.0);
}
