use crate::{
    loader::load_sales_history,
    model::{PolicyParameters, ProductSeries, ReorderPolicy, SalesRecord},
    policy::{compute_policies, group_by_product},
    report::write_policy_report,
};
use eframe::egui;
use egui::{
    Color32, Context, FontFamily, FontId, Margin, RichText, Visuals, Stroke, Vec2
};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot};
use std::collections::HashMap;

const PARAMS_FILE: &str = "reorder_params.json";
const REPORT_FILE: &str = "reorder_policy_report.csv";

// Report series colors: reorder point, safety stock, sales distribution.
const ROP_COLOR: Color32 = Color32::from_rgb(30, 144, 255);
const SAFETY_COLOR: Color32 = Color32::from_rgb(255, 99, 71);
const SALES_COLOR: Color32 = Color32::from_rgb(50, 205, 50);

const HEADING_COLOR: Color32 = Color32::from_rgb(130, 180, 240);
const LABEL_COLOR: Color32 = Color32::from_rgb(160, 175, 195);

pub fn set_custom_style(ctx: &Context) {
    // Warehouse dashboard dark steel theme
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(15, 18, 22);          // near-black slate
    visuals.window_fill = Color32::from_rgb(20, 24, 30);         // window background
    visuals.extreme_bg_color = Color32::from_rgb(32, 38, 46);    // hover highlight
    visuals.faint_bg_color = Color32::from_rgb(26, 31, 38);      // subtle background

    // Widget colors with steel blue accents
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(38, 45, 54);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(70, 82, 96));

    visuals.widgets.hovered.bg_fill  = Color32::from_rgb(52, 62, 74);
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, Color32::from_rgb(100, 150, 210));

    visuals.widgets.active.bg_fill   = Color32::from_rgb(60, 74, 90);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, Color32::from_rgb(120, 180, 255));

    // Selection colors
    visuals.selection.bg_fill = Color32::from_rgb(50, 70, 95);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(130, 180, 240));

    ctx.set_visuals(visuals);

    // Fonts + spacing
    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.indent = 16.0;

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        FontId::new(14.0, FontFamily::Monospace),
    );

    ctx.set_style(style);
}

#[derive(Clone)]
struct Row {
    product: String,
    avg_daily_demand: f64,
    demand_std_dev: f64,
    safety_stock: u32,
    reorder_point: u32,
    observations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortBy {
    Product,
    AvgDemand,
    StdDev,
    SafetyStock,
    ReorderPoint,
}

impl SortBy {
    fn label(self) -> &'static str {
        match self {
            SortBy::Product => "Product",
            SortBy::AvgDemand => "Avg Demand",
            SortBy::StdDev => "Std Dev",
            SortBy::SafetyStock => "Safety Stock",
            SortBy::ReorderPoint => "Reorder Point",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortOrder {
    Ascending,
    Descending,
}

pub struct RestockApp {
    data_path: String,
    loaded: bool,

    records: Vec<SalesRecord>,
    groups: Vec<ProductSeries>,
    group_index: HashMap<String, usize>,
    policies: Vec<ReorderPolicy>,

    rows: Vec<Row>,
    filtered_rows: Vec<Row>,
    search: String,

    params: PolicyParameters,

    // Sorting
    sort_by: SortBy,
    sort_order: SortOrder,

    // UI state
    selected_row: Option<usize>,
    status: Option<String>,
    error: Option<String>,
}

impl RestockApp {
    pub fn new(data_path: String) -> Self {
        let params = Self::load_params();
        Self {
            data_path,
            loaded: false,
            records: vec![],
            groups: vec![],
            group_index: HashMap::new(),
            policies: vec![],
            rows: vec![],
            filtered_rows: vec![],
            search: "".into(),
            params,
            sort_by: SortBy::ReorderPoint,
            sort_order: SortOrder::Descending,
            selected_row: None,
            status: None,
            error: None,
        }
    }

    fn load_params() -> PolicyParameters {
        use std::fs;
        let params = if let Ok(data) = fs::read_to_string(PARAMS_FILE) {
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            PolicyParameters::default()
        };
        // A hand-edited file can hold a nonsensical lead time or Z; fall
        // back to the defaults rather than refusing to start.
        if params.validate().is_ok() {
            params
        } else {
            PolicyParameters::default()
        }
    }

    fn save_params(&self) {
        use std::fs;
        if let Ok(json) = serde_json::to_string(&self.params) {
            let _ = fs::write(PARAMS_FILE, json);
        }
    }

    fn load_data(&mut self) {
        self.status = None;
        self.error = None;

        let records = match load_sales_history(&self.data_path) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to load sales history");
                self.error = Some(e.to_string());
                return;
            }
        };

        self.groups = group_by_product(&records);
        self.group_index = self
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.product.clone(), i))
            .collect();
        self.records = records;
        self.recompute();
    }

    fn recompute(&mut self) {
        let policies = match compute_policies(&self.records, &self.params) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "policy computation failed");
                self.error = Some(e.to_string());
                return;
            }
        };

        // compute_policies publishes the same first-seen order as
        // group_by_product, so policies and groups line up by index.
        let rows = policies
            .iter()
            .zip(&self.groups)
            .map(|(p, g)| Row {
                product: p.product.clone(),
                avg_daily_demand: p.avg_daily_demand,
                demand_std_dev: p.demand_std_dev,
                safety_stock: p.safety_stock,
                reorder_point: p.reorder_point,
                observations: g.quantities.len(),
            })
            .collect();

        self.policies = policies;
        self.rows = rows;
        self.error = None;
        self.loaded = true;
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        let mut filtered = self.rows.clone();

        if !self.search.is_empty() {
            let search_lower = self.search.to_lowercase();
            filtered.retain(|r| r.product.to_lowercase().contains(&search_lower));
        }

        match self.sort_by {
            SortBy::Product => filtered.sort_by(|a, b| {
                if self.sort_order == SortOrder::Descending {
                    b.product.cmp(&a.product)
                } else {
                    a.product.cmp(&b.product)
                }
            }),
            SortBy::AvgDemand => filtered.sort_by(|a, b| {
                if self.sort_order == SortOrder::Descending {
                    b.avg_daily_demand.partial_cmp(&a.avg_daily_demand).unwrap()
                } else {
                    a.avg_daily_demand.partial_cmp(&b.avg_daily_demand).unwrap()
                }
            }),
            SortBy::StdDev => filtered.sort_by(|a, b| {
                if self.sort_order == SortOrder::Descending {
                    b.demand_std_dev.partial_cmp(&a.demand_std_dev).unwrap()
                } else {
                    a.demand_std_dev.partial_cmp(&b.demand_std_dev).unwrap()
                }
            }),
            SortBy::SafetyStock => filtered.sort_by(|a, b| {
                if self.sort_order == SortOrder::Descending {
                    b.safety_stock.cmp(&a.safety_stock)
                } else {
                    a.safety_stock.cmp(&b.safety_stock)
                }
            }),
            SortBy::ReorderPoint => filtered.sort_by(|a, b| {
                if self.sort_order == SortOrder::Descending {
                    b.reorder_point.cmp(&a.reorder_point)
                } else {
                    a.reorder_point.cmp(&b.reorder_point)
                }
            }),
        }

        self.selected_row = None;
        self.filtered_rows = filtered;
    }

    fn on_params_changed(&mut self) {
        self.save_params();
        if self.loaded {
            self.recompute();
        }
    }

    fn export_report(&mut self) {
        match write_policy_report(REPORT_FILE, &self.policies) {
            Ok(()) => {
                self.status = Some(format!(
                    "Exported {} products to {}",
                    self.policies.len(),
                    REPORT_FILE
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "report export failed");
                self.error = Some(e.to_string());
            }
        }
    }

    fn series_for(&self, product: &str) -> Option<&ProductSeries> {
        self.group_index.get(product).map(|&i| &self.groups[i])
    }

    fn inventory_levels_plot(&self, ui: &mut egui::Ui) {
        let mut rop_bars = Vec::with_capacity(self.filtered_rows.len());
        let mut safety_bars = Vec::with_capacity(self.filtered_rows.len());
        for (i, r) in self.filtered_rows.iter().enumerate() {
            let x = i as f64;
            rop_bars.push(
                Bar::new(x - 0.17, r.reorder_point as f64)
                    .width(0.3)
                    .name(&r.product),
            );
            safety_bars.push(
                Bar::new(x + 0.17, r.safety_stock as f64)
                    .width(0.3)
                    .name(&r.product),
            );
        }

        let names: Vec<String> = self
            .filtered_rows
            .iter()
            .map(|r| r.product.clone())
            .collect();

        Plot::new("inventory_levels")
            .height(260.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
                let i = mark.value.round();
                if (mark.value - i).abs() < 0.25 && i >= 0.0 && (i as usize) < names.len() {
                    names[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new("Reorder Point (ROP)", rop_bars).color(ROP_COLOR),
                );
                plot_ui.bar_chart(
                    BarChart::new("Safety Stock", safety_bars).color(SAFETY_COLOR),
                );
            });
    }

    fn sales_distribution_plot(&self, ui: &mut egui::Ui) {
        let mut boxes = Vec::with_capacity(self.filtered_rows.len());
        for (i, r) in self.filtered_rows.iter().enumerate() {
            let Some(series) = self.series_for(&r.product) else {
                continue;
            };
            let mut sorted = series.quantities.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

            let spread = BoxSpread::new(
                sorted[0],
                quantile(&sorted, 0.25),
                quantile(&sorted, 0.50),
                quantile(&sorted, 0.75),
                *sorted.last().unwrap(),
            );
            boxes.push(
                BoxElem::new(i as f64, spread)
                    .box_width(0.5)
                    .name(&r.product),
            );
        }

        let names: Vec<String> = self
            .filtered_rows
            .iter()
            .map(|r| r.product.clone())
            .collect();

        Plot::new("sales_distribution")
            .height(260.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
                let i = mark.value.round();
                if (mark.value - i).abs() < 0.25 && i >= 0.0 && (i as usize) < names.len() {
                    names[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.box_plot(
                    BoxPlot::new("Daily Sales Distribution", boxes).color(SALES_COLOR),
                );
            });
    }
}

impl eframe::App for RestockApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.heading(RichText::new("📦 Safety Stock & Reorder Point Analyzer")
                    .color(HEADING_COLOR)
                    .strong()
                    .size(24.0)
                );
            });

            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                if ui.add_sized(
                    Vec2::new(130.0, 32.0),
                    egui::Button::new(RichText::new("📂 Load History")
                        .color(HEADING_COLOR)
                        .strong())
                ).clicked() {
                    self.load_data();
                }

                ui.label(RichText::new("File:").color(LABEL_COLOR));
                ui.add(
                    egui::TextEdit::singleline(&mut self.data_path)
                        .hint_text("sales_history.csv")
                        .desired_width(220.0)
                );

                ui.separator();

                if ui.add_enabled(
                    self.loaded,
                    egui::Button::new(RichText::new("💾 Export CSV").color(LABEL_COLOR)),
                ).clicked() {
                    self.export_report();
                }

                ui.separator();

                // Search box
                ui.label(RichText::new("🔎").color(LABEL_COLOR));
                let search_response = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Search products...")
                        .desired_width(180.0)
                );
                if search_response.changed() && self.loaded {
                    self.apply_filters();
                }
            });

            if let Some(err) = &self.error {
                ui.add_space(2.0);
                ui.label(RichText::new(format!("⚠ {}", err))
                    .color(Color32::from_rgb(255, 120, 110)));
            } else if let Some(status) = &self.status {
                ui.add_space(2.0);
                ui.label(RichText::new(status).color(Color32::from_rgb(140, 220, 150)));
            }

            ui.add_space(2.0);
        });

        egui::SidePanel::right("policy_settings")
            .min_width(250.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("⚙ Policy Settings").color(HEADING_COLOR));

                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(RichText::new("🚚 Lead Time").strong());
                    let mut lead_time = self.params.lead_time_days;
                    if ui.add(egui::DragValue::new(&mut lead_time)
                        .range(1..=365)
                        .suffix(" days")
                        .speed(1))
                        .changed()
                    {
                        self.params.lead_time_days = lead_time;
                        self.on_params_changed();
                    }

                    ui.add_space(10.0);
                    ui.separator();

                    ui.label(RichText::new("🎯 Service Level").strong());
                    ui.horizontal_wrapped(|ui| {
                        let presets = [
                            ("90%", 1.28),
                            ("95%", 1.65),
                            ("97.5%", 1.96),
                            ("99%", 2.33),
                        ];
                        for (label, z) in presets {
                            let is_selected =
                                (self.params.service_level_z - z).abs() < 0.005;
                            if ui.selectable_label(is_selected, label).clicked()
                                && !is_selected
                            {
                                self.params.service_level_z = z;
                                self.on_params_changed();
                            }
                        }
                    });

                    ui.add_space(6.0);
                    let mut z = self.params.service_level_z;
                    if ui.add(egui::Slider::new(&mut z, 0.5..=4.0)
                        .text("Z")
                        .step_by(0.01))
                        .changed()
                    {
                        self.params.service_level_z = z;
                        self.on_params_changed();
                    }

                    ui.add_space(10.0);
                    ui.separator();

                    // Sorting options
                    ui.label(RichText::new("📊 Sort By").strong());

                    egui::ComboBox::from_id_salt("sort_by")
                        .selected_text(self.sort_by.label())
                        .show_ui(ui, |ui| {
                            let sorts = [
                                SortBy::Product,
                                SortBy::AvgDemand,
                                SortBy::StdDev,
                                SortBy::SafetyStock,
                                SortBy::ReorderPoint,
                            ];
                            for sort in sorts {
                                if ui.selectable_value(&mut self.sort_by, sort, sort.label())
                                    .clicked()
                                {
                                    self.apply_filters();
                                }
                            }
                        });

                    ui.horizontal(|ui| {
                        if ui.selectable_value(&mut self.sort_order, SortOrder::Descending, "⬇ Desc")
                            .clicked()
                        {
                            self.apply_filters();
                        }
                        if ui.selectable_value(&mut self.sort_order, SortOrder::Ascending, "⬆ Asc")
                            .clicked()
                        {
                            self.apply_filters();
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.loaded {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.label(RichText::new("📦")
                            .size(80.0)
                            .color(HEADING_COLOR));
                        ui.add_space(20.0);
                        ui.label(RichText::new("Inventory Replenishment Report")
                            .size(24.0)
                            .color(LABEL_COLOR));
                        ui.add_space(10.0);
                        ui.label(RichText::new("Load a sales history CSV to compute safety stock and reorder points")
                            .color(Color32::from_rgb(130, 145, 165)));
                    });
                });
                return;
            }

            if self.filtered_rows.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("🔍")
                            .size(60.0)
                            .color(LABEL_COLOR));
                        ui.add_space(10.0);
                        ui.label(RichText::new("No products match your search")
                            .size(20.0)
                            .color(LABEL_COLOR));
                    });
                });
                return;
            }

            ui.style_mut().visuals.extreme_bg_color = Color32::from_rgb(32, 38, 46);

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Calculated Inventory Levels")
                    .color(LABEL_COLOR));
                self.inventory_levels_plot(ui);

                ui.add_space(8.0);

                ui.heading(RichText::new("Daily Sales Distribution")
                    .color(LABEL_COLOR));
                self.sales_distribution_plot(ui);

                ui.add_space(8.0);
                ui.separator();

                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::remainder().at_least(160.0).clip(true))  // Product
                    .column(Column::exact(80.0))   // Days
                    .column(Column::exact(120.0))  // Avg demand
                    .column(Column::exact(120.0))  // Std dev
                    .column(Column::exact(120.0))  // Safety stock
                    .column(Column::exact(130.0))  // Reorder point
                    .header(32.0, |mut header| {
                        header.col(|ui| {
                            ui.heading(RichText::new("Product").color(LABEL_COLOR));
                        });
                        header.col(|ui| {
                            ui.heading(RichText::new("Days").color(LABEL_COLOR));
                        });
                        header.col(|ui| {
                            ui.heading(RichText::new("Avg Daily").color(LABEL_COLOR));
                        });
                        header.col(|ui| {
                            ui.heading(RichText::new("Std Dev").color(LABEL_COLOR));
                        });
                        header.col(|ui| {
                            ui.heading(RichText::new("Safety Stock").color(LABEL_COLOR));
                        });
                        header.col(|ui| {
                            ui.heading(RichText::new("Reorder Point").color(LABEL_COLOR));
                        });
                    })
                    .body(|body| {
                        body.rows(32.0, self.filtered_rows.len(), |mut row| {
                            let i = row.index();
                            let r = &self.filtered_rows[i];

                            let is_selected = self.selected_row == Some(i);

                            row.col(|ui| {
                                let mut text = RichText::new(&r.product);
                                if is_selected {
                                    text = text.color(HEADING_COLOR).strong();
                                }
                                if ui.selectable_label(is_selected, text).clicked() {
                                    self.selected_row =
                                        if is_selected { None } else { Some(i) };
                                }
                            });

                            row.col(|ui| {
                                ui.label(RichText::new(r.observations.to_string())
                                    .color(Color32::from_rgb(180, 190, 205)));
                            });

                            row.col(|ui| {
                                ui.label(RichText::new(format!("{:.2}", r.avg_daily_demand))
                                    .color(Color32::from_rgb(180, 200, 255)));
                            });

                            row.col(|ui| {
                                ui.label(RichText::new(format!("{:.2}", r.demand_std_dev))
                                    .color(Color32::from_rgb(200, 180, 255)));
                            });

                            row.col(|ui| {
                                ui.label(RichText::new(r.safety_stock.to_string())
                                    .color(SAFETY_COLOR)
                                    .strong());
                            });

                            row.col(|ui| {
                                ui.label(RichText::new(r.reorder_point.to_string())
                                    .color(ROP_COLOR)
                                    .strong());
                            });
                        });
                    });

                if let Some(idx) = self.selected_row {
                    if let Some(r) = self.filtered_rows.get(idx) {
                        ui.add_space(10.0);
                        ui.separator();

                        let detail = self.series_for(&r.product).map(|series| {
                            let mut sorted = series.quantities.clone();
                            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
                            (
                                sorted[0],
                                quantile(&sorted, 0.50),
                                *sorted.last().unwrap(),
                            )
                        });

                        egui::Frame::new()
                            .fill(Color32::from_rgb(26, 31, 38))
                            .stroke(Stroke::new(2.0, Color32::from_rgb(60, 74, 90)))
                            .inner_margin(Margin::same(12))
                            .show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new("⎘ Product Details:")
                                        .color(HEADING_COLOR)
                                        .strong()
                                        .size(16.0));

                                    ui.label(RichText::new(&r.product)
                                        .color(Color32::from_rgb(210, 225, 245))
                                        .size(16.0));

                                    ui.separator();

                                    let lead_time = f64::from(self.params.lead_time_days);
                                    let mut notes = format!(
                                        "{} days of history | Lead-time demand: {:.1} units",
                                        r.observations,
                                        r.avg_daily_demand * lead_time,
                                    );
                                    if let Some((min, median, max)) = detail {
                                        notes.push_str(&format!(
                                            " | Daily sales min/median/max: {:.0}/{:.0}/{:.0}",
                                            min, median, max
                                        ));
                                    }
                                    ui.label(RichText::new(notes)
                                        .color(LABEL_COLOR)
                                        .italics());
                                });
                            });
                    }
                }
            });
        });

        ctx.request_repaint();
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[idx]
}
