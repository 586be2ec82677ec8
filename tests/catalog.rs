use chrono::NaiveDate;
use macrodata::{Catalog, Error};

fn catalog() -> Catalog {
    Catalog::new()
}

#[test]
fn every_dataset_loads_with_its_published_shape() {
    let c = catalog();
    let expect = [
        ("pwt", 100, 20),
        ("weo", 188, 10),
        ("mad", 92, 5),
        ("mad-regions", 126, 4),
        ("jpn-q", 168, 13),
        ("jpn-yr", 67, 10),
        ("jpn-money", 744, 3),
        ("world-money", 732, 5),
        ("ex", 612, 4),
        ("dates", 16, 6),
        ("bigmac", 60, 7),
        ("debts", 660, 4),
    ];
    for (key, n_rows, n_cols) in expect {
        let t = c.table(key).unwrap();
        assert_eq!(t.n_rows(), n_rows, "row count for {key}");
        assert_eq!(t.n_cols(), n_cols, "column count for {key}");
    }
}

#[test]
fn listing_covers_the_whole_catalog() {
    let t = catalog().list();
    assert_eq!(t.columns(), ["key", "title", "source", "modes"]);
    assert_eq!(t.n_rows(), 12);
    let keys: Vec<_> = t.column("key").unwrap().map(|v| v.to_string()).collect();
    assert!(keys.contains(&"pwt".to_string()));
    assert!(keys.contains(&"bigmac".to_string()));
}

#[test]
fn weo_is_one_row_per_country_year() {
    let t = catalog().table("weo").unwrap();
    assert_eq!(
        t.columns(),
        [
            "countrycode",
            "country",
            "year",
            "GGXWDG_NGDP",
            "LP",
            "LUR",
            "NGDPD",
            "NGDP_R",
            "NGDP_RPCH",
            "PCPIPCH"
        ]
    );
    // sorted by country code, then year
    assert_eq!(t.get(0, "countrycode").unwrap().as_str(), Some("CHN"));
    assert_eq!(t.get(0, "year").unwrap().as_f64(), Some(1980.0));
    assert_eq!(t.get(187, "countrycode").unwrap().as_str(), Some("USA"));
    assert_eq!(t.get(187, "year").unwrap().as_f64(), Some(2026.0));
    // `--` cells arrive as missing and stay missing after the pivot
    assert!(t.get(0, "LUR").unwrap().is_null());
    assert!(t.get(0, "GGXWDG_NGDP").unwrap().is_null());
    let chn_1995 = 1995 - 1980;
    assert!(t.get(chn_1995, "LUR").unwrap().as_f64().is_some());
    // thousands separators in the raw sheet decode to plain numbers
    let jpn_1980 = 2 * 47;
    assert_eq!(t.get(jpn_1980, "country").unwrap().as_str(), Some("Japan"));
    assert_eq!(t.get(jpn_1980, "NGDP_R").unwrap().as_f64(), Some(290000.0));
}

#[test]
fn weo_estimates_table() {
    let t = catalog().estimates("weo").unwrap();
    assert_eq!(
        t.columns(),
        ["ISO", "WEO Subject Code", "Country", "Estimates Start After"]
    );
    assert_eq!(t.n_rows(), 28);
    for v in t.column("Estimates Start After").unwrap() {
        let y = v.as_i64().unwrap();
        assert!(y == 2019 || y == 2020);
    }
    // the slice keeps complete rows only
    for row in 0..t.n_rows() {
        for col in t.columns() {
            assert!(!t.get(row, col).unwrap().is_null());
        }
    }
    assert_eq!(t.get(0, "Country").unwrap().as_str(), Some("Japan"));
}

#[test]
fn weo_definitions_are_the_japan_slice() {
    let t = catalog().definitions("weo").unwrap();
    assert_eq!(
        t.columns(),
        [
            "WEO Subject Code",
            "Subject Descriptor",
            "Subject Notes",
            "Units",
            "Scale"
        ]
    );
    assert_eq!(t.n_rows(), 7);
}

#[test]
fn pwt_definitions_come_from_their_own_member() {
    let t = catalog().definitions("pwt").unwrap();
    assert_eq!(t.columns(), ["Variable name", "Variable definition"]);
    // the member has three section-header rows with no variable name;
    // the view drops them
    assert_eq!(t.n_rows(), 20);
    for v in t.column("Variable name").unwrap() {
        assert!(!v.is_null());
    }
    assert_eq!(t.get(0, "Variable name").unwrap().as_str(), Some("countrycode"));
    assert_eq!(
        t.get(0, "Variable definition").unwrap().as_str(),
        Some("3-letter ISO country code")
    );
}

#[test]
fn mad_drops_rows_without_a_gdp_estimate() {
    let t = catalog().table("mad").unwrap();
    assert_eq!(t.n_rows(), 92);
    for v in t.column("gdppc").unwrap() {
        assert!(!v.is_null());
    }
    // quoted thousands cells decode to plain numbers
    let jp_1820 = t.filter_eq("countrycode", "JPN").unwrap();
    assert_eq!(jp_1820.get(0, "year").unwrap().as_i64(), Some(1820));
    assert_eq!(jp_1820.get(0, "pop").unwrap().as_f64(), Some(31000.0));
}

#[test]
fn regional_sheet_unstacks_to_a_long_panel() {
    let t = catalog().table("mad-regions").unwrap();
    assert_eq!(t.columns(), ["regions", "year", "gdppc", "pop"]);
    assert_eq!(t.n_rows(), 126);
    // 9 regions, 14 years each
    let world = t.filter_eq("regions", "World").unwrap();
    assert_eq!(world.n_rows(), 14);
    for row in t.rows() {
        assert!(!row[2].is_null(), "gdppc present for every region-year");
        assert!(!row[3].is_null(), "pop present for every region-year");
    }
    // the alias used in older scripts still resolves
    let t2 = catalog().table("mad-region").unwrap();
    assert_eq!(t2.n_rows(), 126);
}

#[test]
fn cycle_dates_decode_with_their_gaps() {
    let t = catalog().table("dates").unwrap();
    assert_eq!(
        t.columns(),
        ["cycle", "trough", "peak", "trough2", "expansion", "contraction"]
    );
    // the first cycle opens at its peak
    assert_eq!(t.get(0, "cycle").unwrap().as_i64(), Some(1));
    assert!(t.get(0, "trough").unwrap().is_null());
    assert!(t.get(0, "expansion").unwrap().is_null());
    assert_eq!(
        t.get(0, "peak").unwrap().as_date(),
        NaiveDate::from_ymd_opt(1951, 6, 1)
    );
    assert_eq!(
        t.get(15, "trough2").unwrap().as_date(),
        NaiveDate::from_ymd_opt(2020, 5, 1)
    );
    assert_eq!(t.get(15, "contraction").unwrap().as_i64(), Some(19));
}

#[test]
fn date_columns_parse_as_dates() {
    let c = catalog();
    let q = c.table("jpn-q").unwrap();
    assert_eq!(
        q.get(0, "dates").unwrap().as_date(),
        NaiveDate::from_ymd_opt(1980, 1, 1)
    );
    let b = c.table("bigmac").unwrap();
    assert_eq!(
        b.get(0, "date").unwrap().as_date(),
        NaiveDate::from_ymd_opt(2000, 4, 1)
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let err = catalog().table("nope").unwrap_err();
    assert!(matches!(err, Error::UnknownDataset { .. }));
    let msg = err.to_string();
    assert!(msg.contains("unknown dataset"));
    // the message lists every valid choice
    assert!(msg.contains("expected one of"));
    assert!(msg.contains("pwt"));
    assert!(msg.contains("bigmac"));
}

#[test]
fn description_flags_are_gated_per_dataset() {
    let c = catalog();
    // jpn-q has no definitions table
    assert!(matches!(
        c.load("jpn-q", 2),
        Err(Error::InvalidMode { .. })
    ));
    // only weo carries estimate years
    assert!(matches!(
        c.load("pwt", -2),
        Err(Error::InvalidMode { .. })
    ));
    assert!(matches!(c.load("mad", -1), Err(Error::InvalidMode { .. })));
    assert!(matches!(
        c.load("bigmac", 5),
        Err(Error::InvalidMode { .. })
    ));
    assert!(matches!(c.load("weo", 9), Err(Error::InvalidMode { .. })));
    let msg = c.load("jpn-q", 2).unwrap_err().to_string();
    assert!(msg.contains("does not support description mode 2"));
    assert!(msg.contains("valid modes: 0, 1"));
}

#[test]
fn print_flags_return_no_table() {
    let c = catalog();
    assert!(c.load("pwt", 1).unwrap().is_none());
    assert!(c.load("weo", -1).unwrap().is_none());
    assert!(c.load("pwt", 0).unwrap().is_some());
    assert!(c.load("weo", -2).unwrap().is_some());
    assert!(c.load("pwt", 2).unwrap().is_some());
}
