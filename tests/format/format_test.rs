#[cfg(test)]
mod tests {
    use metaql::format::{DelimitedFormat, GridFormat, JsonFormat, OutputFormat};
    use metaql::store::{Column, MemoryRows, Value};
    use metaql::FormatRegistry;

    fn brokers() -> MemoryRows {
        MemoryRows::new(
            vec![
                Column::typed("ID", "INTEGER"),
                Column::typed("HOST", "TEXT"),
                Column::typed("IS_CONTROLLER", "BOOLEAN"),
            ],
            vec![
                vec![1i64.into(), "host1.com".into(), true.into()],
                vec![2i64.into(), "host2.com".into(), false.into()],
                vec![3i64.into(), "host3.com".into(), false.into()],
            ],
        )
    }

    fn render(format: &dyn OutputFormat, mut rows: MemoryRows) -> String {
        let mut out = Vec::new();
        format.render(&mut rows, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_grid() {
        assert_eq!(
            render(&GridFormat, brokers()),
            "╔════╤═══════════╤═══════════════╗\n\
             ║ ID │ HOST      │ IS_CONTROLLER ║\n\
             ╠════╪═══════════╪═══════════════╣\n\
             ║ 1  │ host1.com │ true          ║\n\
             ╟────┼───────────┼───────────────╢\n\
             ║ 2  │ host2.com │ false         ║\n\
             ╟────┼───────────┼───────────────╢\n\
             ║ 3  │ host3.com │ false         ║\n\
             ╚════╧═══════════╧═══════════════╝\n"
        );
    }

    #[test]
    fn test_grid_empty_result() {
        let rows = MemoryRows::new(vec![Column::new("ID"), Column::new("HOST")], vec![]);
        insta::assert_snapshot!(render(&GridFormat, rows).trim_end(), @r"
        ╔════╤══════╗
        ║ ID │ HOST ║
        ╠════╧══════╣
        ║ (empty)   ║
        ╚═══════════╝
        ");
    }

    #[test]
    fn test_ssv() {
        assert_eq!(
            render(&DelimitedFormat::ssv(), brokers()),
            "# ID HOST IS_CONTROLLER\n\
             1 host1.com true\n\
             2 host2.com false\n\
             3 host3.com false\n"
        );
    }

    #[test]
    fn test_csv() {
        assert_eq!(
            render(&DelimitedFormat::csv(), brokers()),
            "# ID,HOST,IS_CONTROLLER\n\
             1,host1.com,true\n\
             2,host2.com,false\n\
             3,host3.com,false\n"
        );
    }

    #[test]
    fn test_json() {
        assert_eq!(
            render(&JsonFormat, brokers()),
            "[{\"ID\":1,\"HOST\":\"host1.com\",\"IS_CONTROLLER\":true},\
             {\"ID\":2,\"HOST\":\"host2.com\",\"IS_CONTROLLER\":false},\
             {\"ID\":3,\"HOST\":\"host3.com\",\"IS_CONTROLLER\":false}]\n"
        );
    }

    #[test]
    fn test_json_empty_result() {
        let rows = MemoryRows::new(vec![Column::new("ID")], vec![]);
        assert_eq!(render(&JsonFormat, rows), "[]\n");
    }

    #[test]
    fn test_null_rendering() {
        let rows = || {
            MemoryRows::new(
                vec![Column::new("rack"), Column::new("n")],
                vec![vec![Value::Null, 7i64.into()]],
            )
        };
        assert_eq!(render(&DelimitedFormat::ssv(), rows()), "# rack n\nnull 7\n");
        assert_eq!(render(&JsonFormat, rows()), "[{\"rack\":null,\"n\":7}]\n");
        assert!(render(&GridFormat, rows()).contains("║ null │ 7 ║"));
    }

    #[test]
    fn test_json_keeps_column_order() {
        let rows = MemoryRows::new(
            vec![Column::new("z"), Column::new("a"), Column::new("m")],
            vec![vec![1i64.into(), 2i64.into(), 3i64.into()]],
        );
        assert_eq!(render(&JsonFormat, rows), "[{\"z\":1,\"a\":2,\"m\":3}]\n");
    }

    #[test]
    fn test_default_formats() {
        let formats = FormatRegistry::with_defaults().unwrap();
        assert_eq!(formats.names(), vec!["csv", "json", "ssv", "table"]);

        let table = formats.lookup("table").unwrap();
        assert!(render(table.as_ref(), brokers()).starts_with("╔════╤"));
    }
}
