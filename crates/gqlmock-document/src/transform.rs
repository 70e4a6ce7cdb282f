//! Document transforms applied before fingerprinting.

use crate::ast::{
    Definition, Document, Field, FragmentDefinition, InlineFragment, OperationDefinition,
    Selection, SelectionSet,
};

const TYPENAME_FIELD: &str = "__typename";
const CLIENT_DIRECTIVE: &str = "client";
const CONNECTION_DIRECTIVE: &str = "connection";

/// Inject a `__typename` field into every nested selection set.
///
/// The root selection set of an operation is left alone, matching the
/// client behaviour being mocked. Sets that already select `__typename`
/// are not touched, so the transform is idempotent.
#[must_use]
pub fn with_typename(document: &Document) -> Document {
    let definitions = document
        .definitions
        .iter()
        .map(|definition| match definition {
            Definition::Operation(operation) => Definition::Operation(OperationDefinition {
                selection_set: SelectionSet {
                    selections: operation
                        .selection_set
                        .selections
                        .iter()
                        .map(add_typename_to_selection)
                        .collect(),
                },
                ..operation.clone()
            }),
            Definition::Fragment(fragment) => Definition::Fragment(FragmentDefinition {
                selection_set: add_typename_to_set(&fragment.selection_set),
                ..fragment.clone()
            }),
        })
        .collect();
    Document { definitions }
}

fn add_typename_to_set(set: &SelectionSet) -> SelectionSet {
    let mut selections: Vec<Selection> = set
        .selections
        .iter()
        .map(add_typename_to_selection)
        .collect();
    let already_selected = selections.iter().any(
        |selection| matches!(selection, Selection::Field(field) if field.name == TYPENAME_FIELD),
    );
    if !already_selected {
        selections.push(Selection::Field(Field::leaf(TYPENAME_FIELD)));
    }
    SelectionSet { selections }
}

fn add_typename_to_selection(selection: &Selection) -> Selection {
    match selection {
        Selection::Field(field) => {
            if field.selection_set.is_empty() {
                Selection::Field(field.clone())
            } else {
                Selection::Field(Field {
                    selection_set: add_typename_to_set(&field.selection_set),
                    ..field.clone()
                })
            }
        }
        Selection::FragmentSpread(spread) => Selection::FragmentSpread(spread.clone()),
        Selection::InlineFragment(fragment) => Selection::InlineFragment(InlineFragment {
            selection_set: add_typename_to_set(&fragment.selection_set),
            ..fragment.clone()
        }),
    }
}

/// Remove every selection annotated with `@client`.
///
/// Fields whose child selections all disappear are dropped as well.
/// Returns `None` when stripping empties the root selection set of every
/// operation, i.e. the document was client-only.
#[must_use]
pub fn strip_client_selections(document: &Document) -> Option<Document> {
    let mut any_root_left = false;
    let definitions: Vec<Definition> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Operation(operation) => {
                let selection_set = strip_client_from_set(&operation.selection_set)?;
                any_root_left = true;
                Some(Definition::Operation(OperationDefinition {
                    selection_set,
                    ..operation.clone()
                }))
            }
            Definition::Fragment(fragment) => {
                let selection_set = strip_client_from_set(&fragment.selection_set)?;
                Some(Definition::Fragment(FragmentDefinition {
                    selection_set,
                    ..fragment.clone()
                }))
            }
        })
        .collect();
    if any_root_left {
        Some(Document { definitions })
    } else {
        None
    }
}

fn strip_client_from_set(set: &SelectionSet) -> Option<SelectionSet> {
    let selections: Vec<Selection> = set
        .selections
        .iter()
        .filter(|selection| !has_directive(selection.directives(), CLIENT_DIRECTIVE))
        .filter_map(|selection| match selection {
            Selection::Field(field) => {
                if field.selection_set.is_empty() {
                    Some(Selection::Field(field.clone()))
                } else {
                    let selection_set = strip_client_from_set(&field.selection_set)?;
                    Some(Selection::Field(Field {
                        selection_set,
                        ..field.clone()
                    }))
                }
            }
            Selection::FragmentSpread(spread) => Some(Selection::FragmentSpread(spread.clone())),
            Selection::InlineFragment(fragment) => {
                let selection_set = strip_client_from_set(&fragment.selection_set)?;
                Some(Selection::InlineFragment(InlineFragment {
                    selection_set,
                    ..fragment.clone()
                }))
            }
        })
        .collect();
    if selections.is_empty() {
        None
    } else {
        Some(SelectionSet { selections })
    }
}

/// Remove the `@connection` pagination directive from every field,
/// keeping the fields themselves.
#[must_use]
pub fn strip_connection_directive(document: &Document) -> Document {
    let definitions = document
        .definitions
        .iter()
        .map(|definition| match definition {
            Definition::Operation(operation) => Definition::Operation(OperationDefinition {
                selection_set: strip_connection_from_set(&operation.selection_set),
                ..operation.clone()
            }),
            Definition::Fragment(fragment) => Definition::Fragment(FragmentDefinition {
                selection_set: strip_connection_from_set(&fragment.selection_set),
                ..fragment.clone()
            }),
        })
        .collect();
    Document { definitions }
}

fn strip_connection_from_set(set: &SelectionSet) -> SelectionSet {
    let selections = set
        .selections
        .iter()
        .map(|selection| match selection {
            Selection::Field(field) => Selection::Field(Field {
                directives: field
                    .directives
                    .iter()
                    .filter(|directive| directive.name != CONNECTION_DIRECTIVE)
                    .cloned()
                    .collect(),
                selection_set: strip_connection_from_set(&field.selection_set),
                ..field.clone()
            }),
            Selection::FragmentSpread(spread) => Selection::FragmentSpread(spread.clone()),
            Selection::InlineFragment(fragment) => Selection::InlineFragment(InlineFragment {
                selection_set: strip_connection_from_set(&fragment.selection_set),
                ..fragment.clone()
            }),
        })
        .collect();
    SelectionSet { selections }
}

fn has_directive(directives: &[crate::ast::Directive], name: &str) -> bool {
    directives.iter().any(|directive| directive.name == name)
}
