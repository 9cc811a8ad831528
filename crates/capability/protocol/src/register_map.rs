//! 寄存器地址表（静态配置数据）
//!
//! `production()` 为每个读周期实际读取的字段集合；`full()` 为控制器文档中的完整地址目录，
//! 其中部分字段共用地址（标注“待确认”），保持原样，不做去重。

use domain::{RegisterDescriptor, RegisterKind};
use std::collections::BTreeMap;

static PRODUCTION: &[RegisterDescriptor] = &[
    RegisterDescriptor::new("kg_per_hour_actual", 800, RegisterKind::Float32),
    RegisterDescriptor::new("thickness_actual", 802, RegisterKind::Float32),
    RegisterDescriptor::new("gross_width_actual", 804, RegisterKind::Float32),
    RegisterDescriptor::new("grammage_actual", 806, RegisterKind::Float32),
    RegisterDescriptor::new("net_width_actual", 808, RegisterKind::Float32),
    RegisterDescriptor::new("meters_per_min_actual", 810, RegisterKind::Float32),
    RegisterDescriptor::new("kg_per_hour_programmed", 517, RegisterKind::Float32),
    RegisterDescriptor::new("thickness_programmed", 519, RegisterKind::Float32),
    RegisterDescriptor::new("gross_width_programmed", 521, RegisterKind::Float32),
    RegisterDescriptor::new("net_width_programmed", 523, RegisterKind::Float32),
    RegisterDescriptor::new("grammage_programmed", 527, RegisterKind::Float32),
    RegisterDescriptor::new("meters_per_min_programmed", 531, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_grams_per_meter_programmed", 533, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_thickness_programmed", 537, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_percentage_programmed", 539, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_kg_per_hour_programmed", 541, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_programmed", 543, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_programmed", 545, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_programmed", 547, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_programmed", 549, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_programmed", 551, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_programmed", 553, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_grams_per_meter_actual", 812, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_thickness_actual", 816, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_percentage_actual", 818, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_kg_per_hour_actual", 820, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_actual", 822, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_actual", 824, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_actual", 826, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_actual", 828, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_actual", 830, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_actual", 832, RegisterKind::Float32),
    RegisterDescriptor::new("amperes_l1", 112, RegisterKind::Float32),
    RegisterDescriptor::new("power_kw_actual", 130, RegisterKind::Float32),
    RegisterDescriptor::new("op_number", 30000, RegisterKind::FixedString(16)),
    RegisterDescriptor::new("op_kg_per_meter", 30017, RegisterKind::Float32),
    RegisterDescriptor::new("op_coil_size", 30019, RegisterKind::Float32),
    RegisterDescriptor::new("op_status", 30023, RegisterKind::UInt16),
    RegisterDescriptor::new("kg_produced", 30037, RegisterKind::Float32),
    RegisterDescriptor::new("meters_produced", 30053, RegisterKind::Float32),
    RegisterDescriptor::new("op_total_consumption", 30059, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_total", 967, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_total", 969, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_total", 971, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_total", 973, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_total", 975, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_total", 977, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_density", 555, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_density", 557, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_density", 559, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_density", 561, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_density", 563, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_density", 565, RegisterKind::Float32),
];

static FULL: &[RegisterDescriptor] = &[
    RegisterDescriptor::new("voltage_l1", 100, RegisterKind::Float32),
    RegisterDescriptor::new("voltage_l2", 102, RegisterKind::Float32),
    RegisterDescriptor::new("voltage_l3", 104, RegisterKind::Float32),
    RegisterDescriptor::new("amperes_l1", 112, RegisterKind::Float32),
    RegisterDescriptor::new("amperes_l2", 114, RegisterKind::Float32),
    RegisterDescriptor::new("amperes_l3", 116, RegisterKind::Float32),
    RegisterDescriptor::new("power_kw_actual", 130, RegisterKind::Float32),
    RegisterDescriptor::new("kw_total", 136, RegisterKind::Float32),
    RegisterDescriptor::new("kw_per_kg", 140, RegisterKind::Float32),
    RegisterDescriptor::new("kw_day", 154, RegisterKind::Float32),
    RegisterDescriptor::new("kg_per_hour_actual", 800, RegisterKind::Float32),
    RegisterDescriptor::new("thickness_actual", 802, RegisterKind::Float32),
    RegisterDescriptor::new("gross_width_actual", 804, RegisterKind::Float32),
    RegisterDescriptor::new("grammage_actual", 806, RegisterKind::Float32),
    RegisterDescriptor::new("net_width_actual", 808, RegisterKind::Float32),
    RegisterDescriptor::new("meters_per_min_actual", 810, RegisterKind::Float32),
    RegisterDescriptor::new("kg_per_hour_programmed", 517, RegisterKind::Float32),
    RegisterDescriptor::new("thickness_programmed", 519, RegisterKind::Float32),
    RegisterDescriptor::new("gross_width_programmed", 521, RegisterKind::Float32),
    RegisterDescriptor::new("net_width_programmed", 523, RegisterKind::Float32),
    RegisterDescriptor::new("grammage_programmed", 527, RegisterKind::Float32),
    RegisterDescriptor::new("meters_per_min_programmed", 531, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_grams_per_meter_programmed", 533, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_thickness_programmed", 537, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_percentage_programmed", 539, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_kg_per_hour_programmed", 541, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_programmed", 543, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_programmed", 545, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_programmed", 547, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_programmed", 549, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_programmed", 551, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_programmed", 553, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_grams_per_meter_actual", 812, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_thickness_actual", 816, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_percentage_actual", 818, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_kg_per_hour_actual", 820, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_actual", 822, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_actual", 824, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_actual", 826, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_actual", 828, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_actual", 830, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_actual", 832, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_density", 555, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_density", 557, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_density", 559, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_density", 561, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_density", 563, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_density", 565, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo1_total", 967, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo2_total", 969, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo3_total", 971, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo4_total", 973, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo5_total", 975, RegisterKind::Float32),
    RegisterDescriptor::new("screw_a_silo6_total", 977, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_grams_per_meter_programmed", 567, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_thickness_programmed", 571, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_percentage_programmed", 573, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_kg_per_hour_programmed", 575, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo1_programmed", 577, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo2_programmed", 579, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo3_programmed", 581, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo4_programmed", 583, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo5_programmed", 585, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo6_programmed", 587, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_gl_programmed", 589, RegisterKind::Float32), // 含义待确认
    RegisterDescriptor::new("screw_b_grams_per_meter_actual", 846, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_thickness_actual", 850, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_percentage_actual", 852, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_kg_per_hour_actual", 854, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo1_actual", 856, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo2_actual", 858, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo3_actual", 860, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo4_actual", 862, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo5_actual", 864, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo6_actual", 866, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo1_density", 589, RegisterKind::Float32), // 与 screw_b_gl_programmed 同址，待确认
    RegisterDescriptor::new("screw_b_silo2_density", 591, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo3_density", 593, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo4_density", 595, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo5_density", 597, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo6_density", 599, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo1_total", 967, RegisterKind::Float32), // 967..977 与 A 号螺杆累计同址
    RegisterDescriptor::new("screw_b_silo2_total", 969, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo3_total", 971, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo4_total", 973, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo5_total", 975, RegisterKind::Float32),
    RegisterDescriptor::new("screw_b_silo6_total", 977, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_grams_per_meter_programmed", 601, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_thickness_programmed", 605, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_percentage_programmed", 607, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_kg_per_hour_programmed", 609, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo1_programmed", 611, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo2_programmed", 613, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo3_programmed", 615, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo4_programmed", 617, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo5_programmed", 619, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo6_programmed", 621, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_gl_programmed", 623, RegisterKind::Float32), // 含义待确认
    RegisterDescriptor::new("screw_c_grams_per_meter_actual", 880, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_thickness_actual", 884, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_percentage_actual", 886, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_kg_per_hour_actual", 888, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo1_actual", 856, RegisterKind::Float32), // 856..866 与 B 号螺杆实际料仓同址
    RegisterDescriptor::new("screw_c_silo2_actual", 858, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo3_actual", 860, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo4_actual", 862, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo5_actual", 864, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo6_actual", 866, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo1_density", 623, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo2_density", 625, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo3_density", 627, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo4_density", 629, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo5_density", 631, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo6_density", 633, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo1_total", 967, RegisterKind::Float32), // 967..977 与 A、B 号螺杆累计同址
    RegisterDescriptor::new("screw_c_silo2_total", 969, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo3_total", 971, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo4_total", 973, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo5_total", 975, RegisterKind::Float32),
    RegisterDescriptor::new("screw_c_silo6_total", 977, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_grams_per_meter_programmed", 635, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_thickness_programmed", 639, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_percentage_programmed", 641, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_kg_per_hour_programmed", 643, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo1_programmed", 645, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo2_programmed", 647, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo3_programmed", 649, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo4_programmed", 651, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo5_programmed", 653, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo6_programmed", 655, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_gl_programmed", 657, RegisterKind::Float32), // 含义待确认
    RegisterDescriptor::new("screw_d_grams_per_meter_actual", 1027, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_thickness_actual", 1031, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_percentage_actual", 1033, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_kg_per_hour_actual", 1035, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo1_actual", 1037, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo2_actual", 1039, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo3_actual", 1041, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo4_actual", 1043, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo5_actual", 1045, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo6_actual", 1047, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo1_density", 657, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo2_density", 659, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo3_density", 661, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo4_density", 663, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo5_density", 665, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo6_density", 667, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo1_total", 1003, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo2_total", 1005, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo3_total", 1007, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo4_total", 1009, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo5_total", 1011, RegisterKind::Float32),
    RegisterDescriptor::new("screw_d_silo6_total", 1013, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_grams_per_meter_programmed", 669, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_thickness_programmed", 673, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_percentage_programmed", 675, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_kg_per_hour_programmed", 677, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo1_programmed", 679, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo2_programmed", 681, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo3_programmed", 683, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo4_programmed", 685, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo5_programmed", 687, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo6_programmed", 689, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_gl_programmed", 691, RegisterKind::Float32), // 含义待确认
    RegisterDescriptor::new("screw_e_grams_per_meter_actual", 1061, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_thickness_actual", 1065, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_percentage_actual", 1067, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_kg_per_hour_actual", 1069, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo1_actual", 1071, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo2_actual", 1073, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo3_actual", 1075, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo4_actual", 1077, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo5_actual", 1079, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo6_actual", 1081, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo1_density", 691, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo2_density", 693, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo3_density", 695, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo4_density", 697, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo5_density", 699, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo6_density", 701, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo1_total", 1015, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo2_total", 1017, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo3_total", 1019, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo4_total", 1021, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo5_total", 1023, RegisterKind::Float32),
    RegisterDescriptor::new("screw_e_silo6_total", 1025, RegisterKind::Float32),
    RegisterDescriptor::new("op_number", 30000, RegisterKind::FixedString(16)),
    RegisterDescriptor::new("op_kg_per_meter", 30017, RegisterKind::Float32),
    RegisterDescriptor::new("op_coil_size", 30019, RegisterKind::Float32),
    RegisterDescriptor::new("op_status", 30023, RegisterKind::UInt16),
    RegisterDescriptor::new("kg_produced", 30037, RegisterKind::Float32),
    RegisterDescriptor::new("meters_produced", 30053, RegisterKind::Float32),
    RegisterDescriptor::new("op_total_consumption", 30059, RegisterKind::Float32),
    RegisterDescriptor::new("op_trim_waste", 30061, RegisterKind::Float32), // 类型待确认
];

/// 一次读周期要读取的寄存器集合（按读取顺序）。
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterMap {
    registers: Vec<RegisterDescriptor>,
}

impl RegisterMap {
    pub fn new(registers: Vec<RegisterDescriptor>) -> Self {
        Self { registers }
    }

    /// 生产数据读取集合。
    pub fn production() -> Self {
        Self::new(PRODUCTION.to_vec())
    }

    /// 完整地址目录。
    pub fn full() -> Self {
        Self::new(FULL.to_vec())
    }

    pub fn registers(&self) -> &[RegisterDescriptor] {
        &self.registers
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.registers.iter().find(|register| register.name == name)
    }

    /// 被多个字段共用的起始地址（地址 → 字段名）。
    pub fn duplicate_addresses(&self) -> BTreeMap<u32, Vec<&'static str>> {
        let mut by_address: BTreeMap<u32, Vec<&'static str>> = BTreeMap::new();
        for register in &self.registers {
            by_address
                .entry(register.address)
                .or_default()
                .push(register.name);
        }
        by_address.retain(|_, names| names.len() > 1);
        by_address
    }
}
