//! Well-known session state keys

pub const USER_PROFILE: &str = "user_profile";
pub const CHAT_HISTORY: &str = "chat_history";

/// Full recipe payloads live under `recipe_detail_<id>`
pub const RECIPE_DETAIL_PREFIX: &str = "recipe_detail_";
/// List of {id, name} summaries for recipes the user saved
pub const SAVED_RECIPES_LIST: &str = "saved_recipes_list";
/// The recipe most recently presented in this conversation
pub const LAST_RECIPE_ID: &str = "last_recipe_id";

/// Generated shopping lists live under `shopping_list_<recipe id>`
pub const SHOPPING_LIST_PREFIX: &str = "shopping_list_";
/// Ids of every shopping list generated in this conversation
pub const USER_SHOPPING_LISTS: &str = "user_all_shopping_lists";

pub const HOUSEHOLD_TASKS: &str = "household_tasks";
pub const PERSONA_SUMMARY: &str = "persona_summary";

pub fn recipe_detail(id: &str) -> String {
    format!("{RECIPE_DETAIL_PREFIX}{id}")
}

pub fn shopping_list(id: &str) -> String {
    format!("{SHOPPING_LIST_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_keys() {
        assert_eq!(recipe_detail("abc"), "recipe_detail_abc");
        assert_eq!(shopping_list("abc"), "shopping_list_abc");
    }
}
