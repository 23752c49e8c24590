use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(rename = "perPage", alias = "per_page")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MenuSearchField {
    #[default]
    Name,
    OwnerEmail,
    OwnerId,
}

impl MenuSearchField {
    /// Column expression of the admin menu listing the term is matched against.
    pub fn as_sql(&self) -> &'static str {
        match self {
            MenuSearchField::Name => "m.name",
            MenuSearchField::OwnerEmail => "u.email",
            MenuSearchField::OwnerId => "m.user_id::text",
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub page: Option<i64>,
    #[serde(rename = "perPage", alias = "per_page")]
    pub per_page: Option<i64>,
    /// Case-insensitive match on name or e-mail.
    pub search: Option<String>,
}

impl UserListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminMenuQuery {
    pub page: Option<i64>,
    #[serde(rename = "perPage", alias = "per_page")]
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub filter: Option<MenuSearchField>,
}

impl AdminMenuQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Escape `%`, `_` and `\` so a search term matches literally inside `ILIKE`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Substring pattern for `ILIKE`. A blank term matches everything.
pub fn contains_pattern(term: Option<&str>) -> String {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("%{}%", escape_like(t)),
        None => "%".to_string(),
    }
}
