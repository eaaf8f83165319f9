#[cfg(test)]
mod clean_tests {
    use crate::clean::*;
    use approx::assert_relative_eq;
    use polars::prelude::*;

    fn sample_table() -> DataFrame {
        df! {
            "PassengerId" => [1i64, 2, 3, 4, 5, 6],
            "Survived" => [1i64, 0, 1, 0, 0, 1],
            "Pclass" => [1i64, 3, 2, 3, 1, 2],
            "Sex" => ["female", "male", "female", "male", "male", "female"],
            "Age" => [Some(30.0f64), Some(20.0), None, Some(40.0), None, Some(10.0)],
            "Embarked" => [Some("S"), Some("C"), None, Some("S"), None, Some("C")],
            "Cabin" => [Some("C85"), None, None, Some("B20"), None, None],
            "Fare" => [70.0f64, 8.0, 20.0, 7.5, 50.0, 12.0],
        }
        .unwrap()
    }

    #[test]
    fn test_age_fill_uses_pre_fill_median() {
        let df = sample_table();
        let (filled, median) = fill_age_with_median(df).unwrap();

        // median of {10, 20, 30, 40}
        assert_relative_eq!(median, 25.0);
        let age = filled.column("Age").unwrap();
        assert_eq!(age.null_count(), 0);

        let ages: Vec<f64> = age
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ages, vec![30.0, 20.0, 25.0, 40.0, 25.0, 10.0]);
    }

    #[test]
    fn test_age_fill_fails_on_all_null_column() {
        let df = df! {
            "Age" => [None::<f64>, None, None],
        }
        .unwrap();
        assert!(fill_age_with_median(df).is_err());
    }

    #[test]
    fn test_embarked_fill_tie_breaks_lexicographically() {
        // S and C are tied at two occurrences each; C sorts first.
        let df = sample_table();
        let (filled, mode) = fill_embarked_with_mode(df).unwrap();

        assert_eq!(mode, "C");
        let embarked = filled.column("Embarked").unwrap();
        assert_eq!(embarked.null_count(), 0);
    }

    #[test]
    fn test_embarked_fill_picks_most_frequent() {
        let df = df! {
            "Embarked" => [Some("S"), Some("S"), Some("C"), None, None],
        }
        .unwrap();
        let (filled, mode) = fill_embarked_with_mode(df).unwrap();

        assert_eq!(mode, "S");
        let labels: Vec<&str> = filled
            .column("Embarked")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec!["S", "S", "C", "S", "S"]);
    }

    #[test]
    fn test_embarked_fill_fails_on_all_null_column() {
        let df = df! {
            "Embarked" => [None::<&str>, None],
        }
        .unwrap();
        assert!(fill_embarked_with_mode(df).is_err());
    }

    #[test]
    fn test_cabin_drop_is_a_discarded_derivation() {
        // Regression test: the cleaning phase derives a Cabin-less table
        // but never rebinds it, so the working table keeps Cabin and its
        // original nulls.
        let df = sample_table();
        let cabin_nulls_before = df.column("Cabin").unwrap().null_count();

        let (df, _) = fill_age_with_median(df).unwrap();
        let (df, _) = fill_embarked_with_mode(df).unwrap();
        let derived = drop_cabin(&df).unwrap();

        assert!(derived.column("Cabin").is_err());
        let cabin = df.column("Cabin").unwrap();
        assert_eq!(cabin.null_count(), cabin_nulls_before);
        assert_eq!(cabin.null_count(), 4);
    }
}
