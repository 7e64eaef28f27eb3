//! Search surfaces
//!
//! One static [`EntitySchema`] per endpoint. Public surfaces are lenient
//! where clients historically sent loose values (listings) and strict where
//! they were validated up front (users, teams).

use super::normalize::FilterValue;
use super::predicate::{BuildContext, Predicate, Value};
use super::schema::{
    Activity, EntitySchema, EnumSpec, FieldKind, FieldSpec, RangeShape, RangeSpec, Relation,
    Target, TextSearch, Window,
};
use super::sort::{SortKey, SortOption, SortSpec};

// ============================================================================
// Enumerations
// ============================================================================

pub static LISTING_TYPES: EnumSpec = EnumSpec {
    values: &["HAVE_ROOM", "NEED_ROOM"],
    wildcard: None,
    aliases: &[],
};

pub static FURNISHED_STATUSES: EnumSpec = EnumSpec {
    values: &["FULLY_FURNISHED", "SEMI_FURNISHED", "UNFURNISHED"],
    wildcard: None,
    aliases: &[],
};

/// Property types, with the short room-type spellings older clients send
pub static PROPERTY_TYPES: EnumSpec = EnumSpec {
    values: &["APARTMENT", "HOUSE", "STUDIO", "PRIVATE_ROOM", "SHARED_ROOM"],
    wildcard: None,
    aliases: &[
        ("private", "PRIVATE_ROOM"),
        ("shared", "SHARED_ROOM"),
        ("entire", "APARTMENT"),
    ],
};

pub static GENDER_PREFERENCES: EnumSpec = EnumSpec {
    values: &["MALE", "FEMALE", "ANY"],
    wildcard: Some("ANY"),
    aliases: &[],
};

pub static GENDERS: EnumSpec = EnumSpec {
    values: &["MALE", "FEMALE", "NON_BINARY", "PREFER_NOT_TO_SAY"],
    wildcard: None,
    aliases: &[],
};

pub static CLEANLINESS: EnumSpec = EnumSpec {
    values: &["VERY_CLEAN", "MODERATELY_CLEAN", "RELAXED"],
    wildcard: None,
    aliases: &[],
};

pub static SMOKING: EnumSpec = EnumSpec {
    values: &["YES", "NO", "OCCASIONALLY"],
    wildcard: None,
    aliases: &[],
};

pub static DRINKING: EnumSpec = EnumSpec {
    values: &["YES", "NO", "OCCASIONALLY", "SOCIALLY"],
    wildcard: None,
    aliases: &[],
};

pub static PETS: EnumSpec = EnumSpec {
    values: &["HAS_PETS", "NO_PETS", "OPEN_TO_PETS"],
    wildcard: None,
    aliases: &[],
};

pub static SLEEP_SCHEDULES: EnumSpec = EnumSpec {
    values: &["EARLY_BIRD", "NIGHT_OWL", "FLEXIBLE"],
    wildcard: None,
    aliases: &[],
};

pub static USER_STATUSES: EnumSpec = EnumSpec {
    values: &["ACTIVE", "BANNED", "SUSPENDED", "INACTIVE"],
    wildcard: None,
    aliases: &[],
};

pub static RECORD_STATUSES: EnumSpec = EnumSpec {
    values: &["ACTIVE", "INACTIVE"],
    wildcard: None,
    aliases: &[],
};

/// Listing → owning user
pub static LISTING_OWNER: Relation = Relation {
    table: "users",
    foreign_key: "user_id",
    primary_key: "id",
};

/// Team → membership rows of that team
pub static TEAM_MEMBERSHIP: Relation = Relation {
    table: "team_members",
    foreign_key: "id",
    primary_key: "team_id",
};

const RENT_MAX_WINDOW: Window = Window {
    above: Some(0.0),
    below: Some(1_000_000.0),
};

// ============================================================================
// Composite predicates
// ============================================================================

/// Requested room types match either the property type enum or the free-form room type
fn room_type(value: &FilterValue, _: &BuildContext) -> Option<Predicate> {
    let requested = value.as_list()?;

    let mut enums: Vec<Value> = Vec::new();
    for canonical in requested.iter().filter_map(|r| PROPERTY_TYPES.canonical(r)) {
        let value = Value::from(canonical);
        if !enums.contains(&value) {
            enums.push(value);
        }
    }
    let strings: Vec<Value> = requested
        .iter()
        .map(|r| Value::from(r.to_lowercase()))
        .collect();

    let mut group = Vec::with_capacity(2);
    if !enums.is_empty() {
        group.push(Predicate::In {
            column: "property_type",
            values: enums,
        });
    }
    if !strings.is_empty() {
        group.push(Predicate::In {
            column: "room_type",
            values: strings,
        });
    }
    (!group.is_empty()).then(|| Predicate::or(group))
}

/// Only listings whose owner has a verified phone
fn verified_owner(value: &FilterValue, _: &BuildContext) -> Option<Predicate> {
    (value.as_bool() == Some(true))
        .then(|| Predicate::related(&LISTING_OWNER, Predicate::eq("phone_verified", true)))
}

fn verified_user(value: &FilterValue, _: &BuildContext) -> Option<Predicate> {
    (value.as_bool() == Some(true)).then(|| Predicate::eq("phone_verified", true))
}

fn user_status(value: &FilterValue, ctx: &BuildContext) -> Option<Predicate> {
    let FilterValue::Enum(status) = value else {
        return None;
    };
    match *status {
        "ACTIVE" => Some(Predicate::and(vec![
            Predicate::eq("is_active", true),
            Predicate::eq("is_banned", false),
            Predicate::IsNull {
                column: "suspended_until",
            },
        ])),
        "BANNED" => Some(Predicate::eq("is_banned", true)),
        "SUSPENDED" => Some(Predicate::after("suspended_until", ctx.now)),
        "INACTIVE" => Some(Predicate::eq("is_active", false)),
        _ => None,
    }
}

fn record_status(value: &FilterValue, _: &BuildContext) -> Option<Predicate> {
    match value {
        FilterValue::Enum("ACTIVE") => Some(Predicate::eq("is_active", true)),
        FilterValue::Enum("INACTIVE") => Some(Predicate::eq("is_active", false)),
        _ => None,
    }
}

// ============================================================================
// Public surfaces
// ============================================================================

pub static LISTINGS: EntitySchema = EntitySchema {
    name: "listings",
    fields: &[
        FieldSpec::new("city", FieldKind::Text, Target::Contains("city")),
        FieldSpec::new("type", FieldKind::Enum(&LISTING_TYPES), Target::Eq("type")),
        FieldSpec::new(
            "furnishedStatus",
            FieldKind::Enum(&FURNISHED_STATUSES),
            Target::Eq("furnished_status"),
        ),
        FieldSpec::new("roomType", FieldKind::TextList, Target::Build(room_type))
            .aliases(&["roomType", "propertyType"]),
        FieldSpec::new(
            "genderPreference",
            FieldKind::Enum(&GENDER_PREFERENCES),
            Target::Eq("gender_preference"),
        ),
        FieldSpec::new("smokingAllowed", FieldKind::Boolean, Target::Eq("smoking_allowed")),
        FieldSpec::new("petsAllowed", FieldKind::Boolean, Target::Eq("pets_allowed")),
        FieldSpec::new("leaseLength", FieldKind::Number, Target::AtMost("lease_length"))
            .window(Window::POSITIVE),
        FieldSpec::new("amenities", FieldKind::TextList, Target::Intersects("amenities")),
        FieldSpec::new("availableFrom", FieldKind::Date, Target::AtMost("available_from")),
        FieldSpec::new("verifiedOnly", FieldKind::Boolean, Target::Build(verified_owner)),
    ],
    ranges: &[RangeSpec {
        name: "rent",
        min_aliases: &["minRent", "budgetMin", "minBudget"],
        max_aliases: &["maxRent", "budgetMax", "maxBudget"],
        shape: RangeShape::Scalar("rent"),
        strict: false,
        min_window: Window::POSITIVE,
        max_window: RENT_MAX_WINDOW,
    }],
    search: Some(TextSearch {
        param: "search",
        columns: &["title", "description", "city"],
    }),
    sort: SortSpec {
        param: "sortBy",
        order_param: None,
        options: &[
            SortOption {
                value: "newest",
                key: SortKey::desc("created_at"),
            },
            SortOption {
                value: "price_low",
                key: SortKey::asc("rent"),
            },
            SortOption {
                value: "price_high",
                key: SortKey::desc("rent"),
            },
            SortOption {
                value: "popular",
                key: SortKey::desc("view_count"),
            },
        ],
        default: SortKey::desc("created_at"),
    },
    activity: Activity::Active("is_active"),
    strict_paging: false,
};

pub static USERS: EntitySchema = EntitySchema {
    name: "users",
    fields: &[
        FieldSpec::new("gender", FieldKind::Enum(&GENDERS), Target::Eq("gender")),
        FieldSpec::new("city", FieldKind::Text, Target::Contains("city"))
            .aliases(&["city", "location"]),
        FieldSpec::new("occupation", FieldKind::TextList, Target::ContainsAny("occupation")),
        FieldSpec::new(
            "cleanliness",
            FieldKind::Enum(&CLEANLINESS),
            Target::Eq("cleanliness"),
        ),
        FieldSpec::new(
            "smokingPreference",
            FieldKind::Enum(&SMOKING),
            Target::Eq("smoking_preference"),
        )
        .aliases(&["smokingPreference", "smoking"]),
        FieldSpec::new(
            "drinkingPreference",
            FieldKind::Enum(&DRINKING),
            Target::Eq("drinking_preference"),
        ),
        FieldSpec::new(
            "petsPreference",
            FieldKind::Enum(&PETS),
            Target::Eq("pets_preference"),
        )
        .aliases(&["petsPreference", "pets"]),
        FieldSpec::new(
            "sleepSchedule",
            FieldKind::Enum(&SLEEP_SCHEDULES),
            Target::Eq("sleep_schedule"),
        ),
        FieldSpec::new("verifiedOnly", FieldKind::Boolean, Target::Build(verified_user)),
        FieldSpec::new("excludeId", FieldKind::Uuid, Target::NotEq("id")).strict(),
    ],
    ranges: &[
        RangeSpec {
            name: "budget",
            min_aliases: &["budgetMin", "minBudget"],
            max_aliases: &["budgetMax", "maxBudget"],
            shape: RangeShape::Overlap {
                min_column: "budget_min",
                max_column: "budget_max",
            },
            strict: true,
            min_window: Window::ANY,
            max_window: Window::ANY,
        },
        RangeSpec {
            name: "age",
            min_aliases: &["ageMin", "minAge"],
            max_aliases: &["ageMax", "maxAge"],
            shape: RangeShape::Scalar("age"),
            strict: true,
            min_window: Window::ANY,
            max_window: Window::ANY,
        },
    ],
    search: None,
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Active("is_active"),
    strict_paging: true,
};

pub static TEAMS: EntitySchema = EntitySchema {
    name: "teams",
    fields: &[
        FieldSpec::new("city", FieldKind::Text, Target::Contains("city")),
        FieldSpec::new("isActive", FieldKind::Boolean, Target::Activity).strict(),
    ],
    ranges: &[RangeSpec {
        name: "budget",
        min_aliases: &["budgetMin"],
        max_aliases: &["budgetMax"],
        shape: RangeShape::Overlap {
            min_column: "budget_min",
            max_column: "budget_max",
        },
        strict: true,
        min_window: Window::ANY,
        max_window: Window::ANY,
    }],
    search: None,
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Active("is_active"),
    strict_paging: true,
};

// ============================================================================
// Admin surfaces
// ============================================================================

pub static ADMIN_USERS: EntitySchema = EntitySchema {
    name: "admin_users",
    fields: &[
        FieldSpec::new("status", FieldKind::Enum(&USER_STATUSES), Target::Build(user_status)),
        FieldSpec::new("emailVerified", FieldKind::Boolean, Target::Eq("email_verified")),
        FieldSpec::new("phoneVerified", FieldKind::Boolean, Target::Eq("phone_verified")),
        FieldSpec::new("gender", FieldKind::Enum(&GENDERS), Target::Eq("gender")),
        FieldSpec::new("city", FieldKind::Text, Target::Contains("city")),
    ],
    ranges: &[],
    search: Some(TextSearch {
        param: "search",
        columns: &["email", "first_name", "last_name", "phone"],
    }),
    sort: SortSpec {
        param: "sortBy",
        order_param: Some("sortOrder"),
        options: &[
            SortOption {
                value: "joinDate",
                key: SortKey::desc("created_at"),
            },
            SortOption {
                value: "name",
                key: SortKey::asc("first_name"),
            },
        ],
        default: SortKey::desc("created_at"),
    },
    activity: Activity::Unrestricted,
    strict_paging: false,
};

pub static ADMIN_LISTINGS: EntitySchema = EntitySchema {
    name: "admin_listings",
    fields: &[
        FieldSpec::new("type", FieldKind::Enum(&LISTING_TYPES), Target::Eq("type")),
        FieldSpec::new(
            "status",
            FieldKind::Enum(&RECORD_STATUSES),
            Target::Build(record_status),
        ),
        FieldSpec::new("city", FieldKind::Text, Target::Contains("city")),
        FieldSpec::new("isFlagged", FieldKind::Boolean, Target::Eq("is_flagged")),
    ],
    ranges: &[RangeSpec {
        name: "rent",
        min_aliases: &["minRent"],
        max_aliases: &["maxRent"],
        shape: RangeShape::Scalar("rent"),
        strict: false,
        min_window: Window::POSITIVE,
        max_window: Window::POSITIVE,
    }],
    search: Some(TextSearch {
        param: "search",
        columns: &["title", "description", "city"],
    }),
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Unrestricted,
    strict_paging: false,
};

pub static ADMIN_TEAMS: EntitySchema = EntitySchema {
    name: "admin_teams",
    fields: &[
        FieldSpec::new("city", FieldKind::Text, Target::Contains("city")),
        FieldSpec::new(
            "status",
            FieldKind::Enum(&RECORD_STATUSES),
            Target::Build(record_status),
        ),
    ],
    ranges: &[],
    search: Some(TextSearch {
        param: "search",
        columns: &["name"],
    }),
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Unrestricted,
    strict_paging: false,
};

// ============================================================================
// Scoped surfaces
// ============================================================================

/// Active listings of one owner; the owner is added with [`listings_owned_by`]
pub static OWNER_LISTINGS: EntitySchema = EntitySchema {
    name: "owner_listings",
    fields: &[],
    ranges: &[],
    search: None,
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Active("is_active"),
    strict_paging: false,
};

/// Teams of one member; the member is added with [`teams_joined_by`]
pub static MEMBER_TEAMS: EntitySchema = EntitySchema {
    name: "member_teams",
    fields: &[],
    ranges: &[],
    search: None,
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Unrestricted,
    strict_paging: false,
};

/// Reviews received by one user; the reviewee is added with [`visible_reviews_of`]
pub static USER_REVIEWS: EntitySchema = EntitySchema {
    name: "user_reviews",
    fields: &[],
    ranges: &[],
    search: None,
    sort: SortSpec::fixed(SortKey::desc("created_at")),
    activity: Activity::Unrestricted,
    strict_paging: true,
};

pub fn listings_owned_by(user_id: &str) -> Predicate {
    Predicate::eq("user_id", user_id)
}

/// Teams the user created or is an accepted member of
pub fn teams_joined_by(user_id: &str) -> Predicate {
    Predicate::or(vec![
        Predicate::eq("creator_id", user_id),
        Predicate::related(
            &TEAM_MEMBERSHIP,
            Predicate::and(vec![
                Predicate::eq("user_id", user_id),
                Predicate::eq("status", "ACCEPTED"),
            ]),
        ),
    ])
}

pub fn visible_reviews_of(user_id: &str) -> Predicate {
    Predicate::and(vec![
        Predicate::eq("reviewee_id", user_id),
        Predicate::eq("is_hidden", false),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::compile::compile;
    use crate::domain::search::page::PageLimits;
    use crate::domain::search::params::SearchRequest;
    use chrono::{TimeZone, Utc};

    fn conjuncts(schema: &EntitySchema, pairs: &[(&str, &str)]) -> Vec<Predicate> {
        let request = SearchRequest::from_pairs(pairs.iter().copied());
        let ctx = BuildContext {
            now: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };
        compile(&request, schema, &PageLimits::default(), &ctx)
            .unwrap()
            .predicate
            .conjuncts()
            .to_vec()
    }

    #[test]
    fn test_room_type_matches_enum_or_string() {
        let preds = conjuncts(&LISTINGS, &[("roomType", "private,loft")]);
        assert_eq!(
            preds[1],
            Predicate::or(vec![
                Predicate::In {
                    column: "property_type",
                    values: vec![Value::from("PRIVATE_ROOM")],
                },
                Predicate::In {
                    column: "room_type",
                    values: vec![Value::from("private"), Value::from("loft")],
                },
            ])
        );
    }

    #[test]
    fn test_property_type_alias() {
        let preds = conjuncts(&LISTINGS, &[("propertyType", "HOUSE")]);
        assert_eq!(preds.len(), 2);
        assert!(matches!(preds[1], Predicate::Or(ref g) if g.len() == 2));
    }

    #[test]
    fn test_gender_preference_any_is_noop() {
        let preds = conjuncts(&LISTINGS, &[("genderPreference", "any")]);
        assert_eq!(preds, vec![Predicate::eq("is_active", true)]);
    }

    #[test]
    fn test_listing_rent_aliases() {
        let preds = conjuncts(&LISTINGS, &[("minBudget", "100")]);
        assert_eq!(preds[1], Predicate::at_least("rent", 100i64));
    }

    #[test]
    fn test_user_budget_overlap_and_age_scalar() {
        let preds = conjuncts(
            &USERS,
            &[("minBudget", "800"), ("maxBudget", "1200"), ("minAge", "25")],
        );
        assert_eq!(
            &preds[1..],
            &[
                Predicate::at_least("budget_max", 800i64),
                Predicate::at_most("budget_min", 1200i64),
                Predicate::at_least("age", 25i64),
            ]
        );
    }

    #[test]
    fn test_user_exclude_id() {
        let preds = conjuncts(
            &USERS,
            &[("excludeId", "0b7a3a6e-63f6-4a53-9d1a-8f5b9a2c1d10")],
        );
        assert_eq!(
            preds[1],
            Predicate::not(Predicate::eq("id", "0b7a3a6e-63f6-4a53-9d1a-8f5b9a2c1d10"))
        );
    }

    #[test]
    fn test_user_occupation_any_of() {
        let preds = conjuncts(&USERS, &[("occupation", "engineer,Designer")]);
        assert_eq!(
            preds[1],
            Predicate::or(vec![
                Predicate::contains("occupation", "engineer"),
                Predicate::contains("occupation", "designer"),
            ])
        );
    }

    #[test]
    fn test_team_is_active_override() {
        let preds = conjuncts(&TEAMS, &[("isActive", "false")]);
        assert_eq!(preds, vec![Predicate::eq("is_active", false)]);
    }

    #[test]
    fn test_admin_has_no_base_predicate() {
        assert!(conjuncts(&ADMIN_USERS, &[]).is_empty());
        assert!(conjuncts(&ADMIN_LISTINGS, &[]).is_empty());
        assert!(conjuncts(&ADMIN_TEAMS, &[]).is_empty());
    }

    #[test]
    fn test_admin_user_status() {
        let preds = conjuncts(&ADMIN_USERS, &[("status", "suspended")]);
        assert_eq!(
            preds,
            vec![Predicate::after(
                "suspended_until",
                Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            )]
        );

        let preds = conjuncts(&ADMIN_USERS, &[("status", "ACTIVE")]);
        assert!(matches!(preds[0], Predicate::And(ref g) if g.len() == 3));
    }

    #[test]
    fn test_admin_unknown_status_ignored() {
        assert!(conjuncts(&ADMIN_USERS, &[("status", "deleted")]).is_empty());
        assert!(conjuncts(&ADMIN_LISTINGS, &[("status", "deleted")]).is_empty());
        assert!(conjuncts(&ADMIN_TEAMS, &[("status", "archived")]).is_empty());
    }

    #[test]
    fn test_scoped_surfaces() {
        let request = SearchRequest::new();
        let compiled = compile(
            &request,
            &OWNER_LISTINGS,
            &PageLimits::default(),
            &BuildContext::now(),
        )
        .unwrap()
        .restrict(listings_owned_by("u1"));
        assert_eq!(
            compiled.predicate.conjuncts(),
            &[
                Predicate::eq("user_id", "u1"),
                Predicate::eq("is_active", true)
            ]
        );

        let request = SearchRequest::from_pairs([("page", "x")]);
        assert!(
            compile(
                &request,
                &USER_REVIEWS,
                &PageLimits::default(),
                &BuildContext::now()
            )
            .is_err()
        );
    }

    #[test]
    fn test_admin_is_flagged_banana_ignored() {
        assert!(conjuncts(&ADMIN_LISTINGS, &[("isFlagged", "banana")]).is_empty());
        assert_eq!(
            conjuncts(&ADMIN_LISTINGS, &[("isFlagged", "true")]),
            vec![Predicate::eq("is_flagged", true)]
        );
    }

    #[test]
    fn test_text_targets_take_text_fields() {
        let schemas = [
            &LISTINGS,
            &USERS,
            &TEAMS,
            &ADMIN_USERS,
            &ADMIN_LISTINGS,
            &ADMIN_TEAMS,
            &OWNER_LISTINGS,
            &MEMBER_TEAMS,
            &USER_REVIEWS,
        ];
        for schema in schemas {
            for field in schema.fields {
                let fits = match field.target {
                    Target::Contains(_) => matches!(field.kind, FieldKind::Text),
                    Target::ContainsAny(_) => {
                        matches!(field.kind, FieldKind::Text | FieldKind::TextList)
                    }
                    Target::Intersects(_) => matches!(field.kind, FieldKind::TextList),
                    _ => true,
                };
                assert!(fits, "{}.{} pairs {:?}", schema.name, field.name, field.target);
            }
        }
    }
}
