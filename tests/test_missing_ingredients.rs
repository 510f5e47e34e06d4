use homechef::{NewRecipe, RecipeStore};

fn add_recipe(store: &RecipeStore, title: &str, ingredients: &str) -> i64 {
    store
        .add_recipe(&NewRecipe {
            title: title.to_string(),
            ingredients_text: ingredients.to_string(),
            steps_text: "1) Cook.".to_string(),
            ..NewRecipe::default()
        })
        .unwrap()
}

#[test]
fn test_missing_ingredients_for_seeded_recipe() {
    let store = RecipeStore::open_in_memory().unwrap();
    let crepes = store
        .list_recipes(Some("crepes"))
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    store.add_pantry_item("flour").unwrap();
    store.add_pantry_item("eggs").unwrap();

    let missing = store.missing_ingredients(crepes.id).unwrap();
    assert_eq!(missing, vec!["milk", "water", "salt", "butter"]);
}

#[test]
fn test_quantities_and_case_do_not_affect_matching() {
    let store = RecipeStore::open_in_memory().unwrap();
    let id = add_recipe(
        &store,
        "Pancakes",
        "1 cup Flour\n2 EGGS\n1/2 cup milk.",
    );

    store.add_pantry_item("Flour").unwrap();
    store.add_pantry_item("eggs").unwrap();

    assert_eq!(store.missing_ingredients(id).unwrap(), vec!["milk"]);
}

#[test]
fn test_duplicate_keys_collapse_in_first_occurrence_order() {
    let store = RecipeStore::open_in_memory().unwrap();
    let id = add_recipe(
        &store,
        "Syrup",
        "3 tbsp sugar\n1 tbsp sugar\n1 cup water",
    );

    assert_eq!(
        store.missing_ingredients(id).unwrap(),
        vec!["sugar", "water"]
    );
}

#[test]
fn test_last_token_heuristic_misses_multiword_names() {
    let store = RecipeStore::open_in_memory().unwrap();
    let id = add_recipe(&store, "Arrabbiata", "1/4 tsp red pepper flakes");

    store.add_pantry_item("pepper").unwrap();

    // "flakes" is the comparison key, so the "pepper" pantry entry does not
    // cover the line; this imprecision is part of the matching contract
    assert_eq!(store.missing_ingredients(id).unwrap(), vec!["flakes"]);
}

#[test]
fn test_unknown_recipe_yields_empty_list() {
    let store = RecipeStore::open_in_memory().unwrap();
    assert!(store.missing_ingredients(424242).unwrap().is_empty());
}

#[test]
fn test_fully_stocked_pantry_yields_empty_list() {
    let store = RecipeStore::open_in_memory().unwrap();
    let id = add_recipe(&store, "Boiled Eggs", "2 eggs\nwater");

    store.add_pantry_item("eggs").unwrap();
    store.add_pantry_item("water").unwrap();

    assert!(store.missing_ingredients(id).unwrap().is_empty());
}

#[test]
fn test_shop_appends_missing_to_grocery_list() {
    let store = RecipeStore::open_in_memory().unwrap();
    let id = add_recipe(&store, "Omelette", "3 eggs\n1 tbsp butter\nchives");

    store.add_pantry_item("eggs").unwrap();

    let added = store.add_missing_to_grocery(id).unwrap();
    assert_eq!(added, vec!["butter", "chives"]);

    let names: Vec<String> = store
        .list_grocery()
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["butter", "chives"]);

    // shopping twice duplicates grocery entries; the grocery list is a plain
    // list, not a set
    store.add_missing_to_grocery(id).unwrap();
    assert_eq!(store.list_grocery().unwrap().len(), 4);
}
