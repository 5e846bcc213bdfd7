use vnaddr::{AddressConverter, FullAddress};

fn main() {
    pretty_env_logger::init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_address.json");
    let converter = AddressConverter::new();
    if let Err(e) = converter.initialize_from_path(path) {
        eprintln!("Initialization failed: {e}");
        std::process::exit(1);
    }

    let stats = converter.data_stats().expect("initialized above");
    println!("=== Vietnam address converter demo ===\n");
    println!("Provinces: {}", stats.provinces);
    println!("Wards:     {}", stats.wards);
    println!("Mappings:  {}\n", stats.mappings);

    println!("=== Parsing ===\n");

    let parse_cases = vec![
        "Phường 12, Quận Gò Vấp, Thành phố Hồ Chí Minh",
        "123 Lê Lợi, P. Bến Nghé, Q.1, TP.HCM",
        "45 Quang Trung, P.10, Q. Gò Vấp, TP. Hồ Chí Minh",
        "Xã Tân Thông Hội, Huyện Củ Chi, TP Hồ Chí Minh",
        "Phường Lái Thiêu, TX. Thuận An, Tỉnh Bình Dương",
        "Số 5 Nguyễn Huệ",
        "",
    ];

    for addr in parse_cases {
        let r = vnaddr::parse(addr);
        println!("Input: {:?}", addr);
        println!("  street:   {:?}", r.street);
        println!("  ward:     {:?}", r.ward);
        println!("  district: {:?}", r.district);
        println!("  province: {:?}", r.province);
        println!();
    }

    println!("=== Conversion ===\n");

    let addresses = vec![
        "Phường 12, Quận Gò Vấp, Thành phố Hồ Chí Minh",
        "Phường 14, Quận Gò Vấp, Thành phố Hồ Chí Minh",
        "Phường 15, Quận Gò Vấp, Thành phố Hồ Chí Minh",
        "Phường An Lạc, Quận Bình Tân, Thành phố Hồ Chí Minh",
        "Phường An Lạc A, Quận Bình Tân, Thành phố Hồ Chí Minh",
        "10 Lý Tự Trọng, Phường Bến Thành, Thành phố Hồ Chí Minh",
        "Phường Phú Hội, Thành phố Huế, Tỉnh Thừa Thiên Huế",
        "Phường Không Tồn Tại, Quận Không Có, Thành phố Hư Cấu",
    ];

    for addr in addresses {
        let result = converter.convert_address(addr).expect("initialized above");
        println!("Input: {}", addr);
        match (result.converted_address(), result.mapping_info()) {
            (Some(converted), Some(mapping)) => {
                println!("  -> {}", converted);
                println!(
                    "  type: {}  codes: {} -> {}",
                    mapping.mapping_type,
                    mapping.old_ward_code.as_deref().unwrap_or("-"),
                    mapping.new_ward_code.as_deref().unwrap_or("-")
                );
            }
            _ => println!("  failed: {}", result.message().unwrap_or("-")),
        }
        println!();
    }

    println!("=== Structured input as JSON ===\n");

    let address = FullAddress::new("Phường 14", "Quận Gò Vấp", "Thành phố Hồ Chí Minh", "123 Nguyễn Văn Cừ");
    let result = converter.convert_address(&address).expect("initialized above");
    match result.to_json() {
        Ok(json) => println!("{}\n", json),
        Err(e) => eprintln!("Serialization failed: {e}\n"),
    }

    println!("=== Search and listing ===\n");

    let mappings = converter.search_mappings("Gò Vấp").expect("initialized above");
    println!("'Gò Vấp' matches {} mappings:", mappings.len());
    for m in mappings.iter().take(5) {
        println!(
            "  {}, {} -> {}",
            m.old_ward_name,
            m.old_district_name,
            m.new_ward_name.as_deref().unwrap_or("-")
        );
    }

    let wards = converter.wards_by_province("79").expect("initialized above");
    println!("\nProvince 79 has {} wards:", wards.len());
    for w in wards.iter().take(10) {
        println!("  {}", w.name);
    }
}
