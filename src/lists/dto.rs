use serde::Deserialize;

/// `POST /` form: `list` is the title of the list the item goes to.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemForm {
    pub list: String,
    #[serde(default)]
    pub new_item: String,
}

/// `POST /delete` form: `checkbox` carries the item id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemForm {
    #[serde(default)]
    pub checkbox: String,
    pub list_name: String,
}
