use chrono::Utc;

use crate::storage::{Link, NewLink};
use migration::entities::link;

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        name: model.name,
        url: model.url,
        icon: model.icon,
        category: model.category,
        colour: model.colour,
        hit_count: model.hit_count.max(0),
        created_at: model.created_at,
    }
}

/// 将 NewLink 转换为 ActiveModel（id 由数据库分配）
pub fn new_link_to_active_model(new_link: NewLink) -> link::ActiveModel {
    use sea_orm::ActiveValue::*;

    link::ActiveModel {
        id: NotSet,
        name: Set(new_link.name),
        url: Set(new_link.url),
        icon: Set(new_link.icon),
        category: Set(new_link.category),
        colour: Set(new_link.colour),
        hit_count: Set(0),
        created_at: Set(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn negative_counts_are_clamped() {
        let model = link::Model {
            id: 7,
            name: "Docs".into(),
            url: "https://docs.rs".into(),
            icon: None,
            category: Some("Dev".into()),
            colour: None,
            hit_count: -3,
            created_at: Utc::now(),
        };
        let link = model_to_link(model);
        assert_eq!(link.id, 7);
        assert_eq!(link.hit_count, 0);
        assert_eq!(link.category.as_deref(), Some("Dev"));
    }

    #[test]
    fn new_links_start_at_zero_hits() {
        let am = new_link_to_active_model(NewLink::new("Docs", "https://docs.rs"));
        assert!(matches!(am.id, ActiveValue::NotSet));
        assert_eq!(am.hit_count, ActiveValue::Set(0));
        assert_eq!(am.name, ActiveValue::Set("Docs".to_string()));
    }
}
