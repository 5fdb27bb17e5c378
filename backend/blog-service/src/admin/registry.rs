use serde::Serialize;

/// Admin configuration for one entity: a descriptor referencing the
/// entity by name rather than wrapping its type.
#[derive(Debug, Clone, Serialize)]
pub struct EntityAdmin {
    pub entity: &'static str,
    /// Columns shown in the listing.
    pub list_display: &'static [&'static str],
    /// Fields matched by the `q` search parameter.
    pub search_fields: &'static [&'static str],
    /// Fields the listing can be filtered on.
    pub list_filter: &'static [&'static str],
    /// Columns editable directly from the listing.
    pub list_editable: &'static [&'static str],
}

pub const POST_ADMIN: EntityAdmin = EntityAdmin {
    entity: "posts",
    list_display: &[
        "id",
        "text",
        "published_at",
        "author",
        "group",
        "is_published",
    ],
    search_fields: &["text"],
    list_filter: &["published_at", "author"],
    list_editable: &["group", "is_published"],
};

pub const GROUP_ADMIN: EntityAdmin = EntityAdmin {
    entity: "groups",
    list_display: &["title", "slug", "description"],
    search_fields: &[],
    list_filter: &[],
    list_editable: &[],
};

pub const COMMENT_ADMIN: EntityAdmin = EntityAdmin {
    entity: "comments",
    list_display: &["post", "author", "text", "created_at"],
    search_fields: &["text"],
    list_filter: &["created_at", "author"],
    list_editable: &[],
};

pub const FOLLOW_ADMIN: EntityAdmin = EntityAdmin {
    entity: "follows",
    list_display: &["user", "author"],
    search_fields: &["user", "author"],
    list_filter: &["user", "author"],
    list_editable: &[],
};

/// Every entity exposed to the management collaborator.
pub const ENTITY_ADMINS: &[EntityAdmin] = &[POST_ADMIN, GROUP_ADMIN, COMMENT_ADMIN, FOLLOW_ADMIN];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_four_entities_are_registered() {
        let names: Vec<_> = ENTITY_ADMINS.iter().map(|a| a.entity).collect();
        assert_eq!(names, vec!["posts", "groups", "comments", "follows"]);
    }

    #[test]
    fn post_admin_allows_inline_publishing() {
        assert!(POST_ADMIN.list_editable.contains(&"is_published"));
        assert!(POST_ADMIN.list_editable.contains(&"group"));
        assert!(POST_ADMIN.search_fields.contains(&"text"));
    }
}
