use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub banner_color: String,
    pub banner_image: Option<String>,
    pub banner_link: Option<String>,
    pub show_link_button: bool,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub title_position: Option<String>,
    pub font_family: Option<String>,
    pub body_background_color: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_one = "super::social_media::Entity")]
    SocialMedia,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::social_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialMedia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
